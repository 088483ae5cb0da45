//! Endpoints for other portal services.

use axum::{extract::State, http::StatusCode, Json};
use jobportal_core::notification::{self, model::{NewNotification, Notification}};
use jobportal_core::push::ServerEvent;
use tracing::info;

use crate::auth::InternalCaller;
use crate::error::ApiResult;
use crate::state::AppState;

/// Persist a notification raised by a business event, then push it to the
/// recipient's room.
pub async fn create_notification(
    State(state): State<AppState>,
    _caller: InternalCaller,
    Json(req): Json<NewNotification>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    let (recipient, created) = notification::create_notification(&state.db, &req).await?;

    let delivered = state
        .rooms
        .emit(recipient.room(), ServerEvent::Notification(created.clone()))
        .await;
    info!(
        notification_id = %created.id,
        room = %recipient.room(),
        delivered,
        "Notification pushed"
    );

    Ok((StatusCode::CREATED, Json(created)))
}
