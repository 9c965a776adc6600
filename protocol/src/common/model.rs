//! Model catalog records
//!
//! The backend returns an ordered list of these from `GET /api/get_models`.
//! All descriptive fields are optional; only `id` is guaranteed. A reserved
//! id value signals that no usable model is available (bad API key or network
//! failure on the backend side) and callers must short-circuit normal catalog
//! population when they see it.

use serde::{Deserialize, Serialize};

/// Reserved catalog id meaning "no usable model" (API key or network failure)
pub const MODEL_ERROR_SENTINEL: &str = "error-api-key-or-network";

/// Catalog prefix the backend keeps on raw model ids
pub const MODEL_ID_PREFIX: &str = "models/";

/// One entry of the backend model catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Stable catalog key, e.g. `models/gemini-1.5-flash-latest`
    pub id: String,
    #[serde(default)]
    pub dropdown_display_name: Option<String>,
    #[serde(default)]
    pub chinese_display_name: Option<String>,
    #[serde(default)]
    pub chinese_summary_parenthesized: Option<String>,
    #[serde(default)]
    pub chinese_input_output: Option<String>,
    #[serde(default)]
    pub chinese_suitable_for: Option<String>,
    #[serde(default)]
    pub original_description_from_api: Option<String>,
}

impl ModelInfo {
    pub fn is_sentinel(&self) -> bool {
        self.id == MODEL_ERROR_SENTINEL
    }

    /// Label used in selection lists: the display name, falling back to the
    /// id with the catalog prefix stripped
    pub fn label(&self) -> &str {
        match self.dropdown_display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.id.strip_prefix(MODEL_ID_PREFIX).unwrap_or(&self.id),
        }
    }

    /// Name shown at the top of the detail panel, with the same fallbacks the
    /// selection label uses
    pub fn detail_name(&self) -> &str {
        match self.chinese_display_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => self.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bare(id: &str) -> ModelInfo {
        serde_json::from_value(json!({ "id": id })).unwrap()
    }

    #[test]
    fn test_label_falls_back_to_stripped_id() {
        let model = bare("models/gemini-pro");
        assert_eq!(model.label(), "gemini-pro");
        assert_eq!(model.detail_name(), "gemini-pro");
    }

    #[test]
    fn test_label_prefers_display_name() {
        let model: ModelInfo = serde_json::from_value(json!({
            "id": "models/gemini-1.5-pro-latest",
            "dropdown_display_name": "Gemini 1.5 Pro (latest)"
        }))
        .unwrap();
        assert_eq!(model.label(), "Gemini 1.5 Pro (latest)");
    }

    #[test]
    fn test_sentinel_detection() {
        assert!(bare(MODEL_ERROR_SENTINEL).is_sentinel());
        assert!(!bare("models/gemini-pro").is_sentinel());
    }
}
