//! Centralized error types for the notification service.

use thiserror::Error;

/// Main error type for portal operations.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Authentication required: {0}")]
    AuthenticationRequired(String),

    /// Raised both for unknown ids and for ids owned by someone else.
    #[error("Notification not found: {0}")]
    NotificationNotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    Database(#[from] jobportal_db::DbError),
}

/// Result type for portal operations.
pub type PortalResult<T> = Result<T, PortalError>;

impl PortalError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create an authentication error.
    pub fn unauthenticated(msg: impl Into<String>) -> Self {
        Self::AuthenticationRequired(msg.into())
    }
}
