//! Job Portal notification server.
//!
//! Axum-based HTTP API for notification read-state plus the WebSocket push
//! channel.

pub mod auth;
pub mod config;
pub mod error;
pub mod jobs;
pub mod rooms;
pub mod routes;
pub mod state;
pub mod websocket;

use axum::{
    routing::{get, post, put},
    Router,
};
use jobportal_db::DbPool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use config::ServerConfig;
use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let notification_routes = Router::new()
        .route("/notifications", get(routes::notifications::list_notifications))
        .route("/notifications/unread-count", get(routes::notifications::unread_count))
        .route("/notifications/read-all", put(routes::notifications::mark_all_read))
        .route("/notifications/{id}/read", put(routes::notifications::mark_read));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(notification_routes)
        .route("/ws", get(websocket::ws_handler))
        .route("/internal/notifications", post(routes::internal::create_notification))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run the server until Ctrl+C.
pub async fn run_server(db: DbPool, config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr()?;
    let state = AppState::new(db, config);
    jobs::spawn_retention(
        state.db.clone(),
        state.config.retention_days,
        state.config.purge_interval,
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Notification server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Notification server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
