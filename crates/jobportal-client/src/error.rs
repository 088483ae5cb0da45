//! Client error types.

use thiserror::Error;

/// Errors raised while talking to the notification server.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Push channel error: {0}")]
    Channel(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("Cannot decode server payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// True for 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
