//! Audio source intake
//!
//! Two paths into the backend: hand it a YouTube URL to fetch, or upload a
//! local audio file. Both return an opaque `processed_audio_path` that the
//! analysis request later carries verbatim. Input validation happens before
//! any request is built.

use std::path::PathBuf;
use std::sync::Arc;

use audigest_protocol::{ProcessUrlRequest, ProcessedSourceResponse, SourceType};

use crate::client::{endpoints, ApiClient};
use crate::error::{AudigestError, Result};
use crate::ui::Severity;

/// A source the user asked to analyze, before backend processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceInput {
    Youtube(String),
    Upload(PathBuf),
}

impl SourceInput {
    pub fn source_type(&self) -> SourceType {
        match self {
            SourceInput::Youtube(_) => SourceType::Youtube,
            SourceInput::Upload(_) => SourceType::Upload,
        }
    }

    /// Display name recorded in the session: the URL itself, or the file name
    pub fn display_name(&self) -> String {
        match self {
            SourceInput::Youtube(url) => url.trim().to_string(),
            SourceInput::Upload(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// Validate locally; on rejection, returns the message to log and how
    /// strongly to flag it. No request is made when this fails.
    pub fn validate(&self) -> std::result::Result<(), (Severity, String)> {
        match self {
            SourceInput::Youtube(url) => {
                let url = url.trim();
                if url.is_empty() {
                    return Err((Severity::Warning, "Please enter a YouTube URL.".to_string()));
                }
                if !url.starts_with("http") {
                    return Err((
                        Severity::Error,
                        "Invalid YouTube URL. Enter a full URL starting with http/https."
                            .to_string(),
                    ));
                }
                Ok(())
            }
            SourceInput::Upload(path) => {
                if !path.is_file() {
                    return Err((
                        Severity::Warning,
                        format!("Audio file not found: {}", path.display()),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Submits validated sources to the backend
pub struct SourceService<C> {
    client: Arc<C>,
}

impl<C: ApiClient> SourceService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Process the source server-side, returning the opaque audio reference
    pub async fn submit(&self, input: &SourceInput) -> Result<ProcessedSourceResponse> {
        match input {
            SourceInput::Youtube(url) => {
                let request = ProcessUrlRequest {
                    url: url.trim().to_string(),
                };
                tracing::info!(url = %request.url, "submitting YouTube URL");
                self.client
                    .post_json(endpoints::PROCESS_YOUTUBE_URL, &request)
                    .await
            }
            SourceInput::Upload(path) => {
                tracing::info!(file = %path.display(), "uploading audio file");
                self.client
                    .post_file(endpoints::UPLOAD_AUDIO_FILE, "audio_file", path)
                    .await
            }
        }
    }

    /// Validate then submit, mapping rejections into errors that carry the
    /// same message severity-rendered by the caller
    pub async fn validate_and_submit(
        &self,
        input: &SourceInput,
    ) -> Result<ProcessedSourceResponse> {
        if let Err((_, message)) = input.validate() {
            return Err(AudigestError::invalid_input(message));
        }
        self.submit(input).await
    }
}
