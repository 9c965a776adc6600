//! Shared DTOs for the audigest backend API
//!
//! This crate contains the wire types exchanged with the audio analysis
//! backend, organized by domain:
//! - `common`: task and model records shared across endpoints
//! - `api`: request/response types per endpoint group

pub mod api;
pub mod common;

pub use api::*;
pub use common::*;
