//! API key gate
//!
//! The backend needs a valid Google API key before the model catalog or any
//! analysis is available. The gate distinguishes the three server-reported
//! key states from a failed status check itself, so callers can decide
//! whether to prompt, retry, or proceed.

use std::sync::Arc;

use audigest_protocol::{ApiKeyStatus, ApiKeyStatusResponse, SetApiKeyRequest, SetApiKeyResponse};

use crate::client::{endpoints, ApiClient};
use crate::error::{AudigestError, Result};

/// Outcome of a key status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyGateState {
    /// Key present and validated; the catalog can load
    Valid,
    /// Key present but rejected by the provider
    Invalid,
    /// No key stored yet
    NotSet,
    /// The status check itself failed (backend down, bad response)
    CheckFailed(String),
}

impl KeyGateState {
    /// True when the user must (re)enter a key before anything else works
    pub fn requires_key(&self) -> bool {
        !matches!(self, KeyGateState::Valid)
    }
}

pub struct KeyGate<C> {
    client: Arc<C>,
}

impl<C: ApiClient> KeyGate<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Query the backend for the stored key's state. A transport or parse
    /// failure is reported as [`KeyGateState::CheckFailed`], not bubbled up,
    /// so the caller can still render a useful prompt.
    pub async fn check(&self) -> (KeyGateState, Option<String>) {
        match self
            .client
            .get_json::<ApiKeyStatusResponse>(endpoints::CHECK_API_KEY_STATUS)
            .await
        {
            Ok(response) => {
                tracing::debug!(status = ?response.status, "key status");
                let state = match response.status {
                    ApiKeyStatus::SetAndValid => KeyGateState::Valid,
                    ApiKeyStatus::SetButInvalid => KeyGateState::Invalid,
                    ApiKeyStatus::NotSet => KeyGateState::NotSet,
                };
                (state, Some(response.message))
            }
            Err(e) => (KeyGateState::CheckFailed(e.to_string()), None),
        }
    }

    /// Submit a new key. Empty input is rejected client-side; the backend
    /// validates the key against the provider before storing it.
    pub async fn set_key(&self, api_key: &str) -> Result<SetApiKeyResponse> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AudigestError::key("Please enter your Google API key."));
        }

        let request = SetApiKeyRequest {
            api_key: api_key.to_string(),
        };
        self.client
            .post_json(endpoints::SET_API_KEY, &request)
            .await
            .map_err(|e| match e.api_detail() {
                Some(detail) => AudigestError::key_rejected(detail.render_lines()),
                None => e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::mocks::MockApiClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_check_maps_server_states() {
        for (wire, expected) in [
            ("set_and_valid", KeyGateState::Valid),
            ("set_but_invalid", KeyGateState::Invalid),
            ("not_set", KeyGateState::NotSet),
        ] {
            let mock = Arc::new(MockApiClient::new());
            mock.queue_response(
                endpoints::CHECK_API_KEY_STATUS,
                json!({ "status": wire, "message": "m" }),
            );
            let gate = KeyGate::new(mock);
            let (state, message) = gate.check().await;
            assert_eq!(state, expected);
            assert_eq!(message.as_deref(), Some("m"));
        }
    }

    #[tokio::test]
    async fn test_failed_check_is_not_an_error() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_error(
            endpoints::CHECK_API_KEY_STATUS,
            AudigestError::network("connection refused"),
        );
        let gate = KeyGate::new(mock);

        let (state, _) = gate.check().await;
        match state {
            KeyGateState::CheckFailed(ref message) => assert!(message.contains("connection refused")),
            other => panic!("expected CheckFailed, got {:?}", other),
        }
        assert!(state.requires_key());
    }

    #[tokio::test]
    async fn test_empty_key_rejected_without_request() {
        let mock = Arc::new(MockApiClient::new());
        let gate = KeyGate::new(mock.clone());

        assert!(gate.set_key("   ").await.is_err());
        assert!(mock.requests().is_empty());
    }

    #[tokio::test]
    async fn test_set_key_posts_trimmed_key() {
        let mock = Arc::new(MockApiClient::new());
        mock.queue_response(
            endpoints::SET_API_KEY,
            json!({ "message": "API key validated and stored" }),
        );
        let gate = KeyGate::new(mock.clone());

        let response = gate.set_key("  AIzaSyTest123  ").await.unwrap();
        assert_eq!(response.message, "API key validated and stored");

        let requests = mock.requests();
        assert_eq!(requests[0].endpoint, endpoints::SET_API_KEY);
        assert_eq!(requests[0].payload.as_ref().unwrap()["api_key"], "AIzaSyTest123");
    }
}
