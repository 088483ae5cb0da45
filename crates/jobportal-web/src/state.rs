//! Application state.

use jobportal_db::DbPool;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::rooms::RoomHub;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub rooms: Arc<RoomHub>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: DbPool, config: ServerConfig) -> Self {
        Self {
            db,
            rooms: Arc::new(RoomHub::new(config.queue_capacity)),
            config: Arc::new(config),
        }
    }
}
