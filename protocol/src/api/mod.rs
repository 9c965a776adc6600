//! API DTOs module
//!
//! Request/response types organized by endpoint group:
//! - `key`: API key status and submission
//! - `report`: analysis job submission
//! - `source`: audio source processing (URL and file upload)

pub mod key;
pub mod report;
pub mod source;

pub use key::*;
pub use report::*;
pub use source::*;
