//! Analysis job submission
//!
//! Builds and submits `generate_report` requests. Preconditions are checked
//! in a fixed order with distinct messages, so the first missing piece is the
//! one reported: processed source, then primary format, then a usable model.

use std::str::FromStr;
use std::sync::Arc;

use audigest_protocol::{
    CustomPrompts, GenerateReportRequest, SourceType, SubmitReportResponse, MODEL_ERROR_SENTINEL,
};

use crate::client::{endpoints, ApiClient};
use crate::error::{AudigestError, Result};

/// Primary report formats; exactly one per job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryFormat {
    SummaryTc,
    SummaryTranscriptTc,
    TranscriptBilingualSummary,
}

impl PrimaryFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryFormat::SummaryTc => "summary_tc",
            PrimaryFormat::SummaryTranscriptTc => "summary_transcript_tc",
            PrimaryFormat::TranscriptBilingualSummary => "transcript_bilingual_summary",
        }
    }
}

impl FromStr for PrimaryFormat {
    type Err = AudigestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summary_tc" | "summary" => Ok(PrimaryFormat::SummaryTc),
            "summary_transcript_tc" | "summary-transcript" => Ok(PrimaryFormat::SummaryTranscriptTc),
            "transcript_bilingual_summary" | "bilingual" => {
                Ok(PrimaryFormat::TranscriptBilingualSummary)
            }
            other => Err(AudigestError::invalid_input(format!(
                "Unknown primary format '{}'. Choose one of: summary_tc, summary_transcript_tc, transcript_bilingual_summary",
                other
            ))),
        }
    }
}

/// Extra downloadable formats; any number per job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtraFormat {
    Markdown,
    PlainText,
}

impl ExtraFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtraFormat::Markdown => "md",
            ExtraFormat::PlainText => "txt",
        }
    }
}

impl FromStr for ExtraFormat {
    type Err = AudigestError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "md" | "markdown" => Ok(ExtraFormat::Markdown),
            "txt" | "text" => Ok(ExtraFormat::PlainText),
            other => Err(AudigestError::invalid_input(format!(
                "Unknown extra format '{}'. Choose one of: md, txt",
                other
            ))),
        }
    }
}

/// Everything a job submission needs, before precondition checks
#[derive(Debug, Clone, Default)]
pub struct AnalysisDraft {
    pub source_type: Option<SourceType>,
    pub source_path: Option<String>,
    pub model_id: Option<String>,
    pub primary: Option<PrimaryFormat>,
    pub extras: Vec<ExtraFormat>,
    pub custom_prompts: Option<CustomPrompts>,
}

impl AnalysisDraft {
    /// Check preconditions in order and build the request. The message of the
    /// first failing check is the one surfaced.
    pub fn into_request(self) -> Result<GenerateReportRequest> {
        let (source_type, source_path) = match (self.source_type, self.source_path) {
            (Some(t), Some(p)) if !p.is_empty() => (t, p),
            _ => {
                return Err(AudigestError::invalid_input(
                    "Process an audio source first (YouTube URL or file upload).",
                ))
            }
        };

        let primary = self.primary.ok_or_else(|| {
            AudigestError::invalid_input(
                "Select a primary report format (summary or transcript type).",
            )
        })?;

        let model_id = match self.model_id {
            Some(id) if !id.is_empty() && id != MODEL_ERROR_SENTINEL => id,
            _ => {
                return Err(AudigestError::invalid_input(
                    "Select a usable AI model, or resolve the API key/network problem.",
                ))
            }
        };

        let mut output_options = vec![primary.as_str().to_string()];
        output_options.extend(self.extras.iter().map(|f| f.as_str().to_string()));

        Ok(GenerateReportRequest {
            source_type,
            source_path,
            model_id,
            output_options,
            custom_prompts: self.custom_prompts,
        })
    }
}

pub struct AnalysisService<C> {
    client: Arc<C>,
}

impl<C: ApiClient> AnalysisService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn submit(&self, draft: AnalysisDraft) -> Result<SubmitReportResponse> {
        let request = draft.into_request()?;
        tracing::info!(
            model = %request.model_id,
            options = ?request.output_options,
            "submitting analysis job"
        );
        self.client
            .post_json(endpoints::GENERATE_REPORT, &request)
            .await
    }
}
