//! Configuration management for the audigest CLI
//!
//! The on-disk config file persists connection settings and the two visual
//! preferences (theme, font size) under fixed keys, re-applied on every load.
//! Environment variables prefixed `AUDIGEST_` override the file.

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::{AudigestError, Result};
use crate::theme::{FontSize, Theme};

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Persisted CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub endpoint: String,
    pub timeout: u64,
    pub verbose: bool,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub font_size: FontSize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            verbose: false,
            theme: Theme::default(),
            font_size: FontSize::default(),
        }
    }
}

impl AppConfig {
    /// Load from the given path (or the default location), falling back to
    /// defaults and writing them out when the file is missing or unreadable
    pub async fn load(config_path: Option<&Path>) -> Result<Self> {
        let config_file = match config_path {
            Some(path) => path.to_path_buf(),
            None => default_config_path(),
        };

        if config_file.exists() {
            let content = fs::read_to_string(&config_file).await?;
            match serde_json::from_str::<Self>(&content) {
                Ok(config) => Ok(config),
                Err(_) => {
                    let config = Self::default();
                    config.save(&config_file).await?;
                    Ok(config)
                }
            }
        } else {
            let config = Self::default();
            config.save(&config_file).await?;
            Ok(config)
        }
    }

    pub async fn save(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content).await?;
        Ok(())
    }

    /// Connection settings for the HTTP client, layered with environment
    /// overrides
    pub fn to_client_config(&self) -> ClientConfig {
        ClientConfig::builder()
            .base_url(&self.endpoint)
            .timeout(self.timeout)
            .verbose(self.verbose)
            .build()
            .unwrap_or_else(|_| ClientConfig {
                base_url: self.endpoint.clone(),
                timeout: self.timeout,
                verbose: self.verbose,
            })
    }
}

pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("audigest")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("audigest")
}

/// Connection configuration for the HTTP client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub verbose: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ENDPOINT.to_string(),
            timeout: default_timeout(),
            verbose: false,
        }
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    base_url: Option<String>,
    timeout: Option<u64>,
    verbose: Option<bool>,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        let mut builder = Config::builder()
            .set_default("base_url", DEFAULT_ENDPOINT)?
            .set_default("timeout", DEFAULT_TIMEOUT_SECS as i64)?
            .set_default("verbose", false)?;

        builder = builder.add_source(Environment::with_prefix("AUDIGEST").try_parsing(true));

        if let Some(base_url) = self.base_url {
            builder = builder.set_override("base_url", base_url)?;
        }
        if let Some(timeout) = self.timeout {
            builder = builder.set_override("timeout", timeout as i64)?;
        }
        if let Some(verbose) = self.verbose {
            builder = builder.set_override("verbose", verbose)?;
        }

        let config: ClientConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(AudigestError::config("Endpoint URL cannot be empty"));
        }
        Ok(())
    }

    /// Join an endpoint path onto the configured base URL
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        let base_url = if self.base_url.starts_with("http://") || self.base_url.starts_with("https://")
        {
            self.base_url.clone()
        } else {
            format!("http://{}", self.base_url)
        };

        format!("{}/{}", base_url.trim_end_matches('/'), endpoint)
    }
}
