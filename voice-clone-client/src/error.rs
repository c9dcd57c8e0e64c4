use thiserror::Error;

/// Errors from the upload and synthesis services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("service returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("failed to parse service response: {0}")]
    Parse(String),

    #[error("service rejected the request: {0}")]
    Rejected(String),

    #[error("invalid service configuration: {0}")]
    Config(String),

    #[error("no voice profile, upload a recording first")]
    NoProfile,

    #[error("text to synthesize is empty")]
    EmptyText,
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Request(err)
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
