//! NS client error types.

use crate::domain::TimeError;

/// Errors from the NS API client.
#[derive(Debug, thiserror::Error)]
pub enum NsError {
    /// Caller parameters were rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// API returned a non-2xx status code
    #[error("NS API request failed: {status} - {body}")]
    Http { status: u16, body: String },

    /// Request failed (connection refused, timeout, DNS, ...)
    #[error("NS API request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response JSON did not match the expected shape
    #[error("failed to parse NS API response: {message}")]
    Deserialize {
        message: String,
        body: Option<String>,
    },

    /// API key cannot be used as a header value
    #[error("invalid API key format")]
    InvalidApiKey,

    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl NsError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            NsError::Validation(_) => "validation_error",
            NsError::Http { .. } => "upstream_http_error",
            NsError::Transport(_) => "upstream_transport_error",
            NsError::Deserialize { .. } => "deserialization_error",
            NsError::InvalidApiKey | NsError::ClientBuild(_) => "configuration_error",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, NsError::Validation(_))
    }
}

impl From<TimeError> for NsError {
    fn from(err: TimeError) -> Self {
        NsError::Validation(err.to_string())
    }
}
