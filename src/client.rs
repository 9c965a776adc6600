//! HTTP client for the audigest backend
//!
//! All endpoints speak JSON except the audio upload, which is a multipart
//! form. Non-2xx responses carry a `detail` payload that is normalized into
//! [`ApiDetail`] before being surfaced, so callers can re-render it per
//! presentation surface.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::multipart;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::ClientConfig;
use crate::error::{ApiDetail, AudigestError, Result};

/// Backend operations the services need; implemented by [`HttpClient`] and by
/// the test mock
///
/// The returned futures are `Send` so the poller can drive requests from a
/// spawned task.
pub trait ApiClient: Send + Sync {
    fn config(&self) -> &ClientConfig;

    fn get_json<R>(&self, endpoint: &str) -> impl Future<Output = Result<R>> + Send
    where
        R: DeserializeOwned + Send;

    fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> impl Future<Output = Result<R>> + Send
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send;

    /// Upload a local file as a multipart form with the given field name
    fn post_file<R>(
        &self,
        endpoint: &str,
        field: &str,
        path: &Path,
    ) -> impl Future<Output = Result<R>> + Send
    where
        R: DeserializeOwned + Send;

    /// Fetch a raw resource (report downloads)
    fn get_bytes(&self, endpoint: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// reqwest-backed client
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self { client, config })
    }

    async fn decode<R>(response: reqwest::Response) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AudigestError::api(
                status.as_u16(),
                ApiDetail::from_body(&body, status.as_u16()),
            ));
        }

        serde_json::from_str::<R>(&body)
            .map_err(|_| AudigestError::invalid_response(format!("Invalid API response: {}", body)))
    }
}

impl ApiClient for HttpClient {
    fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<R>(&self, endpoint: &str) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(%url, "GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(response).await
    }

    async fn post_json<T, R>(&self, endpoint: &str, payload: &T) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned + Send,
    {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(%url, "POST");
        let response = self.client.post(&url).json(payload).send().await?;
        Self::decode(response).await
    }

    async fn post_file<R>(&self, endpoint: &str, field: &str, path: &Path) -> Result<R>
    where
        R: DeserializeOwned + Send,
    {
        let url = self.config.endpoint_url(endpoint);
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AudigestError::io_from_error(format!("Reading {}", path.display()), e))?;

        let part = multipart::Part::bytes(bytes).file_name(file_name);
        let form = multipart::Form::new().part(field.to_string(), part);

        tracing::debug!(%url, file = %path.display(), "POST multipart");
        let response = self.client.post(&url).multipart(form).send().await?;
        Self::decode(response).await
    }

    async fn get_bytes(&self, endpoint: &str) -> Result<Vec<u8>> {
        let url = self.config.endpoint_url(endpoint);
        tracing::debug!(%url, "GET bytes");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AudigestError::api(
                status.as_u16(),
                ApiDetail::from_body(&body, status.as_u16()),
            ));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Endpoint paths consumed by this client
pub mod endpoints {
    pub const PROCESS_YOUTUBE_URL: &str = "/api/process_youtube_url";
    pub const UPLOAD_AUDIO_FILE: &str = "/api/upload_audio_file";
    pub const CHECK_API_KEY_STATUS: &str = "/api/check_api_key_status";
    pub const SET_API_KEY: &str = "/api/set_api_key";
    pub const GET_MODELS: &str = "/api/get_models";
    pub const GENERATE_REPORT: &str = "/api/generate_report";
    pub const TASKS: &str = "/api/tasks";

    pub fn task(task_id: &str) -> String {
        format!("{}/{}", TASKS, task_id)
    }
}
