//! Server settings.

use std::net::SocketAddr;
use std::time::Duration;

use jobportal_core::notification::DEFAULT_RETENTION_DAYS;

use crate::rooms::DEFAULT_QUEUE_CAPACITY;

/// Default port the server binds to.
pub const DEFAULT_PORT: u16 = 3040;

/// Runtime configuration for the notification server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// HS256 secret used to verify session tokens.
    pub jwt_secret: String,
    /// Shared secret for `/internal/*`. Open when unset.
    pub internal_token: Option<String>,
    pub retention_days: i64,
    pub purge_interval: Duration,
    pub queue_capacity: usize,
}

impl ServerConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            jwt_secret: jwt_secret.into(),
            internal_token: None,
            retention_days: DEFAULT_RETENTION_DAYS,
            purge_interval: Duration::from_secs(3600),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address '{}': {}", addr, e))
    }
}
