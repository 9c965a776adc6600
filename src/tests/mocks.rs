//! Mock implementations for testing

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::error::{AudigestError, Result};

/// One request observed by the mock
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub endpoint: String,
    pub payload: Option<serde_json::Value>,
}

enum Queued {
    Json(serde_json::Value),
    Bytes(Vec<u8>),
    Error(AudigestError),
}

/// Mock API client: queue per-endpoint responses up front, then assert on
/// the requests the code under test made
#[derive(Clone)]
pub struct MockApiClient {
    config: ClientConfig,
    queued: Arc<Mutex<VecDeque<(String, Queued)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApiClient {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            queued: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn queue_response(&self, endpoint: &str, response: serde_json::Value) {
        self.queued
            .lock()
            .unwrap()
            .push_back((endpoint.to_string(), Queued::Json(response)));
    }

    pub fn queue_bytes(&self, endpoint: &str, bytes: Vec<u8>) {
        self.queued
            .lock()
            .unwrap()
            .push_back((endpoint.to_string(), Queued::Bytes(bytes)));
    }

    pub fn queue_error(&self, endpoint: &str, error: AudigestError) {
        self.queued
            .lock()
            .unwrap()
            .push_back((endpoint.to_string(), Queued::Error(error)));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, method: &str, endpoint: &str, payload: Option<serde_json::Value>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            payload,
        });
    }

    /// Pop the oldest queued entry for this endpoint
    fn take(&self, endpoint: &str) -> Result<Queued> {
        let mut queued = self.queued.lock().unwrap();
        let position = queued.iter().position(|(e, _)| e == endpoint);
        match position.and_then(|i| queued.remove(i)) {
            Some((_, entry)) => Ok(entry),
            None => Err(AudigestError::internal(format!(
                "no mock response queued for {}",
                endpoint
            ))),
        }
    }

    fn take_json<R: DeserializeOwned>(&self, endpoint: &str) -> Result<R> {
        match self.take(endpoint)? {
            Queued::Json(value) => serde_json::from_value(value).map_err(AudigestError::from),
            Queued::Error(error) => Err(error),
            Queued::Bytes(_) => Err(AudigestError::internal(format!(
                "byte response queued where JSON was expected for {}",
                endpoint
            ))),
        }
    }
}

impl Default for MockApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiClient for MockApiClient {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        self.record("GET", endpoint, None);
        self.take_json(endpoint)
    }

    async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let payload = serde_json::to_value(payload)?;
        self.record("POST", endpoint, Some(payload));
        self.take_json(endpoint)
    }

    async fn post_file<R>(&self, endpoint: &str, field: &str, path: &Path) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        self.record(
            "POST-FILE",
            endpoint,
            Some(serde_json::json!({
                "field": field,
                "path": path.display().to_string()
            })),
        );
        self.take_json(endpoint)
    }

    async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>> {
        self.record("GET", endpoint, None);
        match self.take(endpoint)? {
            Queued::Bytes(bytes) => Ok(bytes),
            Queued::Json(value) => Ok(serde_json::to_vec(&value)?),
            Queued::Error(error) => Err(error),
        }
    }
}
