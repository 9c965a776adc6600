//! Unified error handling for the audigest client
//!
//! Every error carries a unique code in the format `AXXX`:
//! - A1XX: API key errors
//! - A2XX: network and API errors
//! - A3XX: file and I/O errors
//! - A4XX: configuration errors
//! - A5XX: validation and input errors
//! - A6XX: task and report errors
//! - A9XX: internal errors
//!
//! Backend failure payloads are normalized into [`ApiDetail`] so each
//! presentation surface can render the same structured detail its own way.

use std::fmt;

use thiserror::Error;

/// Unified Result type for all audigest operations
pub type Result<T> = std::result::Result<T, AudigestError>;

/// Error codes for audigest operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // API key (A1XX)
    /// A101: API key missing or rejected client-side
    InvalidApiKey,
    /// A102: backend rejected the submitted key
    KeyRejected,

    // Network (A2XX)
    /// A201: HTTP request failed
    HttpError,
    /// A202: connection timeout
    ConnectionTimeout,
    /// A203: connection refused
    ConnectionRefused,
    /// A204: API returned an error response
    ApiError,
    /// A205: response body was not the expected JSON
    InvalidResponse,

    // File/IO (A3XX)
    /// A301: file not found
    FileNotFound,
    /// A302: file read error
    FileReadError,
    /// A303: file write error
    FileWriteError,

    // Configuration (A4XX)
    /// A401: configuration error
    ConfigError,
    /// A402: invalid endpoint URL
    InvalidEndpoint,

    // Validation (A5XX)
    /// A501: invalid input
    InvalidInput,
    /// A502: validation failed
    ValidationFailed,

    // Task/report (A6XX)
    /// A601: task not found
    TaskNotFound,
    /// A602: report not available
    ReportUnavailable,
    /// A603: report download failed
    DownloadFailed,

    // Internal (A9XX)
    /// A901: internal error
    InternalError,
    /// A902: serialization error
    SerializationError,
}

impl ErrorCode {
    pub fn code(&self) -> u16 {
        match self {
            ErrorCode::InvalidApiKey => 101,
            ErrorCode::KeyRejected => 102,

            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ConnectionRefused => 203,
            ErrorCode::ApiError => 204,
            ErrorCode::InvalidResponse => 205,

            ErrorCode::FileNotFound => 301,
            ErrorCode::FileReadError => 302,
            ErrorCode::FileWriteError => 303,

            ErrorCode::ConfigError => 401,
            ErrorCode::InvalidEndpoint => 402,

            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,

            ErrorCode::TaskNotFound => 601,
            ErrorCode::ReportUnavailable => 602,
            ErrorCode::DownloadFailed => 603,

            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "A{}", self.code())
    }
}

/// One entry of a field-level validation error list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Path segments locating the offending field
    pub loc: Vec<String>,
    pub msg: String,
    pub kind: Option<String>,
}

impl FieldError {
    pub fn path(&self) -> String {
        if self.loc.is_empty() {
            "unknown location".to_string()
        } else {
            self.loc.join(" -> ")
        }
    }
}

/// Normalized backend `detail` payload
///
/// All endpoints answer failures with either `{detail: string}` or
/// `{detail: [{loc, msg, type}]}`; anything else (including non-JSON bodies)
/// is preserved as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiDetail {
    Fields(Vec<FieldError>),
    Message(String),
    Raw(serde_json::Value),
}

impl ApiDetail {
    /// Parse a raw response body into the tagged detail shape
    pub fn from_body(body: &str, status: u16) -> Self {
        let value: serde_json::Value = match serde_json::from_str(body) {
            Ok(v) => v,
            Err(_) => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    return ApiDetail::Message(format!("request failed (status {})", status));
                }
                return ApiDetail::Message(trimmed.to_string());
            }
        };
        Self::from_detail_value(value.get("detail").cloned().unwrap_or(value), status)
    }

    fn from_detail_value(detail: serde_json::Value, status: u16) -> Self {
        match detail {
            serde_json::Value::String(s) => ApiDetail::Message(s),
            serde_json::Value::Array(entries) => {
                let mut fields = Vec::with_capacity(entries.len());
                for entry in &entries {
                    let Some(msg) = entry.get("msg").and_then(|m| m.as_str()) else {
                        return ApiDetail::Raw(serde_json::Value::Array(entries));
                    };
                    let loc = entry
                        .get("loc")
                        .and_then(|l| l.as_array())
                        .map(|segments| {
                            segments
                                .iter()
                                .map(|s| match s {
                                    serde_json::Value::String(s) => s.clone(),
                                    other => other.to_string(),
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    let kind = entry
                        .get("type")
                        .and_then(|t| t.as_str())
                        .map(str::to_string);
                    fields.push(FieldError {
                        loc,
                        msg: msg.to_string(),
                        kind,
                    });
                }
                ApiDetail::Fields(fields)
            }
            serde_json::Value::Null => {
                ApiDetail::Message(format!("request failed (status {})", status))
            }
            other => ApiDetail::Raw(other),
        }
    }

    /// Render field errors as one `field 'path': msg` line each, other shapes
    /// as their message/serialized form
    pub fn render_lines(&self) -> String {
        match self {
            ApiDetail::Fields(fields) => fields
                .iter()
                .map(|f| format!("field '{}': {}", f.path(), f.msg))
                .collect::<Vec<_>>()
                .join("\n"),
            ApiDetail::Message(msg) => msg.clone(),
            ApiDetail::Raw(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }

    /// Render field errors with their validation kind, joined by `;` +
    /// newline, as the analysis surface shows them
    pub fn render_detailed(&self) -> String {
        match self {
            ApiDetail::Fields(fields) => fields
                .iter()
                .map(|f| {
                    format!(
                        "field '{}': {} (type: {})",
                        f.path(),
                        f.msg,
                        f.kind.as_deref().unwrap_or("unknown")
                    )
                })
                .collect::<Vec<_>>()
                .join(";\n"),
            other => other.render_lines(),
        }
    }
}

impl fmt::Display for ApiDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render_lines())
    }
}

/// Main error type for all audigest operations
#[derive(Error, Debug)]
pub enum AudigestError {
    /// API key missing or rejected
    #[error("[{code}] API key error: {message}")]
    Key { code: ErrorCode, message: String },

    /// HTTP/network error
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// API error with status code and normalized detail
    #[error("[{code}] API error ({status}): {detail}")]
    Api {
        code: ErrorCode,
        status: u16,
        detail: ApiDetail,
    },

    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration error
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    /// Invalid input caught before any network call
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    /// Task/report error
    #[error("[{code}] Task error: {message}")]
    Task { code: ErrorCode, message: String },

    /// Internal/unexpected error
    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    /// JSON serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl AudigestError {
    pub fn key(message: impl Into<String>) -> Self {
        Self::Key {
            code: ErrorCode::InvalidApiKey,
            message: message.into(),
        }
    }

    pub fn key_rejected(message: impl Into<String>) -> Self {
        Self::Key {
            code: ErrorCode::KeyRejected,
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            code: ErrorCode::HttpError,
            message: message.into(),
            source: None,
        }
    }

    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// API error with an already-normalized detail payload
    pub fn api(status: u16, detail: ApiDetail) -> Self {
        Self::Api {
            code: ErrorCode::ApiError,
            status,
            detail,
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::InvalidResponse,
            status: 0,
            detail: ApiDetail::Message(message.into()),
        }
    }

    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            code: ErrorCode::TaskNotFound,
            message: message.into(),
        }
    }

    pub fn report_unavailable(message: impl Into<String>) -> Self {
        Self::Task {
            code: ErrorCode::ReportUnavailable,
            message: message.into(),
        }
    }

    pub fn download(message: impl Into<String>) -> Self {
        Self::Task {
            code: ErrorCode::DownloadFailed,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Key { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::Task { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// The structured backend detail, when this is an API error
    pub fn api_detail(&self) -> Option<&ApiDetail> {
        match self {
            Self::Api { detail, .. } => Some(detail),
            _ => None,
        }
    }

    /// HTTP status of the backend response, when this is an API error
    pub fn api_status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AudigestError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<reqwest::Error> for AudigestError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for AudigestError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for AudigestError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<dialoguer::Error> for AudigestError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: format!("Prompt error: {}", err),
        }
    }
}
