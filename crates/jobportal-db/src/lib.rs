//! Job Portal storage layer.
//!
//! Notifications persist in Redis through [`RedisStore`]; [`MemoryStore`]
//! implements the same [`NotificationStore`] contract in process.

pub mod client;
pub mod memory;
pub mod queries;
pub mod store;

use std::sync::Arc;

pub use client::{DbError, DbResult, RedisPool};
pub use memory::MemoryStore;
pub use queries::notifications::RedisStore;
pub use store::{DbPool, NotificationRow, NotificationStore};

/// Redis URL used when none is configured.
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Initialize a Redis-backed pool.
pub async fn init_pool(redis_url: &str) -> DbResult<DbPool> {
    let manager = client::connect(redis_url).await?;
    tracing::debug!(redis_url = %redis_url, "Redis connection manager ready");
    Ok(Arc::new(RedisStore::new(manager)))
}

/// A pool backed by the in-memory store.
pub fn memory_pool() -> DbPool {
    Arc::new(MemoryStore::new())
}
