//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobportal_core::PortalError;
use serde_json::json;
use tracing::error;

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError(pub PortalError);

impl From<PortalError> for ApiError {
    fn from(err: PortalError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PortalError::AuthenticationRequired(_) => {
                (StatusCode::UNAUTHORIZED, "Authentication required".to_string())
            }
            // Same body whether the id is unknown or owned by someone else.
            PortalError::NotificationNotFound(_) => {
                (StatusCode::NOT_FOUND, "Notification not found".to_string())
            }
            PortalError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            PortalError::Database(e) => {
                error!(error = %e, "Storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": { "message": message } }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
