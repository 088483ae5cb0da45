//! Background job: purge read notifications past the retention window.

use jobportal_db::DbPool;
use std::time::Duration;
use tokio::time;

/// Spawn the retention task. Call this once at startup.
pub fn spawn_retention(pool: DbPool, retention_days: i64, every: Duration) {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        loop {
            interval.tick().await;
            if let Err(e) =
                jobportal_core::notification::purge_expired(&pool, retention_days).await
            {
                tracing::error!("retention job failed: {}", e);
            }
        }
    });
}
