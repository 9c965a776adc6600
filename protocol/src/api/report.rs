//! Report generation DTOs
//!
//! Used by `POST /api/generate_report`. The backend validates the request and
//! answers 422 with a field-level `detail` list when it is malformed.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::source::SourceType;

/// Per-job prompt overrides
///
/// A field is present only when the user's prompt differs from the built-in
/// default; the whole object is sent as `null` when neither does, so the
/// server-side defaults stay in charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPrompts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_prompt: Option<String>,
}

impl CustomPrompts {
    pub fn is_empty(&self) -> bool {
        self.summary_prompt.is_none() && self.transcript_prompt.is_none()
    }
}

/// Request body for POST /api/generate_report
///
/// `output_options` is the primary report format followed by any extra
/// formats, in selection order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateReportRequest {
    pub source_type: SourceType,
    #[validate(length(min = 1))]
    pub source_path: String,
    #[validate(length(min = 1))]
    pub model_id: String,
    #[validate(length(min = 1))]
    pub output_options: Vec<String>,
    pub custom_prompts: Option<CustomPrompts>,
}

/// Response for POST /api/generate_report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitReportResponse {
    pub task_id: String,
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_custom_prompts_serialize_as_null() {
        let request = GenerateReportRequest {
            source_type: SourceType::Youtube,
            source_path: "/tmp/audio/abc.mp3".into(),
            model_id: "models/gemini-1.5-flash-latest".into(),
            output_options: vec!["summary_tc".into(), "md".into()],
            custom_prompts: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("custom_prompts").unwrap().is_null());
        assert_eq!(value["output_options"], json!(["summary_tc", "md"]));
    }

    #[test]
    fn test_partial_custom_prompts_omit_default_field() {
        let prompts = CustomPrompts {
            summary_prompt: Some("focus on action items".into()),
            transcript_prompt: None,
        };
        let value = serde_json::to_value(&prompts).unwrap();
        assert_eq!(value, json!({ "summary_prompt": "focus on action items" }));
    }

    #[test]
    fn test_request_validation_rejects_empty_output_options() {
        let request = GenerateReportRequest {
            source_type: SourceType::Upload,
            source_path: "/tmp/audio/abc.mp3".into(),
            model_id: "models/gemini-pro".into(),
            output_options: vec![],
            custom_prompts: None,
        };
        assert!(validator::Validate::validate(&request).is_err());
    }
}
