use crate::store::StoreError;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response arrived: connection failure, DNS, or the request timed out.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("({status}) {body}")]
    Client { status: StatusCode, body: ErrorBody },

    #[error("({status}) {body}")]
    Server { status: StatusCode, body: ErrorBody },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Token storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub(crate) fn from_status(status: StatusCode, bytes: &[u8]) -> Self {
        let body = ErrorBody::parse(bytes);
        if status.is_server_error() {
            ApiError::Server { status, body }
        } else {
            ApiError::Client { status, body }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Client { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Client { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Network(e) if e.is_timeout())
    }

    /// Server supplied message, if any, suitable for showing next to a form.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Client { body, .. } | ApiError::Server { body, .. } => body.detail.as_deref(),
            _ => None,
        }
    }
}

/// Body of a non-2xx response.
///
/// The backend usually answers `{"detail": "..."}`, but field validation errors
/// come back as a map of field name to messages, so the raw text is kept too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub detail: Option<String>,
    pub raw: String,
}

#[derive(Deserialize)]
struct DetailEnvelope {
    detail: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    pub fn parse(bytes: &[u8]) -> Self {
        let detail = serde_json::from_slice::<DetailEnvelope>(bytes)
            .ok()
            .and_then(|e| e.detail.or(e.message).or(e.error));

        Self {
            detail,
            raw: String::from_utf8_lossy(bytes).into_owned(),
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.detail, self.raw.trim()) {
            (Some(detail), _) => f.write_str(detail),
            (None, "") => f.write_str("no details"),
            (None, raw) => f.write_str(raw),
        }
    }
}
