//! Liveness and store health.

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let store_status = match state.db.ping().await {
        Ok(()) => "healthy",
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            "unhealthy"
        }
    };

    Json(json!({
        "status": if store_status == "healthy" { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": {
            "backend": state.db.backend(),
            "status": store_status,
        },
        "connections": state.rooms.connection_count().await,
    }))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{call, test_app};
    use axum::http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health_reports_store() {
        let (app, _) = test_app();
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"]["backend"], "memory");
        assert_eq!(body["connections"], 0);
    }
}
