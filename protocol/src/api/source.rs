//! Audio source DTOs
//!
//! `POST /api/process_youtube_url` takes a JSON body; the upload endpoint
//! takes a multipart form with an `audio_file` field. Both return the same
//! response shape carrying the processed-source reference later analysis
//! submissions must quote.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Kind of audio source the user picked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Youtube,
    Upload,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Youtube => write!(f, "youtube"),
            SourceType::Upload => write!(f, "upload"),
        }
    }
}

/// Request body for POST /api/process_youtube_url
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProcessUrlRequest {
    #[validate(url)]
    pub url: String,
}

/// Response shared by both source endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedSourceResponse {
    /// Opaque backend-assigned reference to the processed audio
    pub processed_audio_path: String,
    pub message: String,
}
