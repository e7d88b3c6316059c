//! Error model used by Issue Hub API client operations.

use std::io;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, HubError>;

/// Represents the failures an Issue Hub call can surface: non-success HTTP responses with the backend's `detail` text, rejected credentials, timeouts, network issues, payload decoding problems and other unexpected errors.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("http {status}: {}", detail_or_message(.detail, .message))]
    Http {
        status: StatusCode,
        detail: Option<String>,
        message: String,
    },
    #[error("authentication error: {}", .0.as_deref().unwrap_or("not authenticated"))]
    Authentication(Option<String>),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl HubError {
    /// Constructs an HTTP error variant, pulling `detail` out of the body when present.
    pub fn http(status: StatusCode, body: impl Into<String>) -> Self {
        let message = body.into();
        HubError::Http {
            status,
            detail: extract_detail(&message),
            message,
        }
    }

    /// Human-readable detail reported by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            HubError::Http { detail, .. } => detail.as_deref(),
            HubError::Authentication(detail) => detail.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of the failed response, if the failure came from one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HubError::Http { status, .. } => Some(*status),
            HubError::Authentication(_) => Some(StatusCode::UNAUTHORIZED),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, HubError::Authentication(_))
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(StatusCode::FORBIDDEN)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for HubError {
    /// Converts reqwest errors into semantic HubError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            HubError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            HubError::Http {
                status,
                detail: None,
                message: err.to_string(),
            }
        } else if err.is_connect() {
            HubError::Network(err.to_string())
        } else if err.is_decode() {
            HubError::Serialization(err.to_string())
        } else {
            HubError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for HubError {
    /// Converts serde_json decode/encode failures into serialization errors.
    fn from(err: serde_json::Error) -> Self {
        HubError::Serialization(err.to_string())
    }
}

fn detail_or_message<'a>(detail: &'a Option<String>, message: &'a str) -> &'a str {
    detail.as_deref().unwrap_or(message)
}

/// Reads the `detail` field of an error body.
///
/// Plain strings are returned verbatim. Request validation failures carry a
/// list of `{loc, msg, type}` objects; their messages are joined.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    match value.get("detail")? {
        Value::String(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}
