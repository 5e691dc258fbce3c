//! YouTube client error types.

use thiserror::Error;

/// Result type for YouTube API operations.
pub type YouTubeResult<T> = Result<T, YouTubeError>;

/// Errors that can occur while talking to the YouTube Data API.
#[derive(Debug, Error)]
pub enum YouTubeError {
    #[error("Failed to configure YouTube client: {0}")]
    ConfigError(String),

    #[error("Video not found: {0}")]
    NotFound(String),

    #[error("Forbidden (quota or key restriction): {0}")]
    Forbidden(String),

    #[error("Server error ({0}): {1}")]
    ServerError(u16, String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl YouTubeError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Build a network error with the request URL stripped.
    ///
    /// Request URLs carry the API key as a query parameter.
    pub fn network(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }

    /// Map an HTTP error status to an error variant.
    pub fn from_http_status(status: u16, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match status {
            403 => Self::Forbidden(msg),
            404 => Self::NotFound(msg),
            500..=599 => Self::ServerError(status, msg),
            _ => Self::RequestFailed(format!("HTTP {}: {}", status, msg)),
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::ServerError(status, _) => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
