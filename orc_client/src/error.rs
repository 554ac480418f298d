//! Errors surfaced by the ORC client.

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, OrcError>;

/// Errors produced while talking to the ORC server.
#[derive(Debug, thiserror::Error)]
pub enum OrcError {
    #[error("Invalid action tag: {0}")]
    InvalidActionTag(String),

    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Could not find ORC server at [{0}].")]
    ServerNotFound(String),

    /// The server answered with an `error` field.
    #[error("{0}")]
    Remote(String),

    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OrcError {
    /// Whether the server itself rejected the request, as opposed to a
    /// transport or validation failure on our side.
    pub fn is_remote(&self) -> bool {
        matches!(self, OrcError::Remote(_) | OrcError::UnexpectedStatus(_))
    }
}
