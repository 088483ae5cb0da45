//! Redis connection management and storage error types.

use redis::aio::ConnectionManager;
use thiserror::Error;

/// Storage error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for storage operations.
pub type DbResult<T> = Result<T, DbError>;

/// Redis connection pool. ConnectionManager multiplexes internally and is
/// Clone, so callers clone it to get a mutable handle for each operation.
pub type RedisPool = ConnectionManager;

/// Open a Redis connection manager from a URL.
///
/// Example URL: `redis://127.0.0.1:6379`
pub async fn connect(redis_url: &str) -> DbResult<RedisPool> {
    let client = redis::Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;
    Ok(manager)
}
