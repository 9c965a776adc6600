//! API key DTOs
//!
//! Used by `GET /api/check_api_key_status` and `POST /api/set_api_key`.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Server-reported state of the stored API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyStatus {
    SetAndValid,
    SetButInvalid,
    NotSet,
}

/// Response for GET /api/check_api_key_status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyStatusResponse {
    pub status: ApiKeyStatus,
    pub message: String,
}

/// Request body for POST /api/set_api_key
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SetApiKeyRequest {
    #[validate(length(min = 1))]
    pub api_key: String,
}

/// Response for POST /api/set_api_key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetApiKeyResponse {
    pub message: String,
}
