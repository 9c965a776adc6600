//! Shared test support: mock API client and fixture helpers

pub mod mocks;
pub mod utils;
