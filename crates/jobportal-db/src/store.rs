//! Storage contract shared by the Redis and in-memory backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::client::{DbError, DbResult};

/// A persisted notification, stored as one JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRow {
    pub id: String,
    pub owner: String,
    pub kind: String,
    pub message: String,
    pub related_id: Option<String>,
    pub is_read: bool,
    pub created_at: String,
    pub read_at: Option<String>,
}

impl NotificationRow {
    /// Parse `created_at` back into a timestamp.
    pub fn created_at_utc(&self) -> DbResult<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }

    /// Parse `read_at`, if the row has been read.
    pub fn read_at_utc(&self) -> DbResult<Option<DateTime<Utc>>> {
        self.read_at.as_deref().map(parse_timestamp).transpose()
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::OperationFailed(format!("bad timestamp '{}': {}", raw, e)))
}

/// Persistence operations for notifications.
///
/// Every write touches a single notification document, except the bulk
/// operations which are a sequence of such writes.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new notification.
    async fn insert(&self, row: &NotificationRow) -> DbResult<()>;

    /// Look up a notification by id.
    async fn get(&self, id: &str) -> DbResult<Option<NotificationRow>>;

    /// All notifications for an owner, newest first.
    async fn list_by_owner(&self, owner: &str) -> DbResult<Vec<NotificationRow>>;

    /// Number of unread notifications for an owner.
    async fn count_unread(&self, owner: &str) -> DbResult<i64>;

    /// Flag a notification as read and return it.
    ///
    /// `read_at` is recorded only on the first call; later calls return the
    /// row unchanged. Fails with [`DbError::NotFound`] if the id is unknown.
    async fn mark_read(&self, id: &str, read_at: DateTime<Utc>) -> DbResult<NotificationRow>;

    /// Flag every unread notification of an owner as read. Returns how many
    /// rows changed.
    async fn mark_all_read(&self, owner: &str, read_at: DateTime<Utc>) -> DbResult<u64>;

    /// Delete read notifications whose `read_at` is older than `cutoff`.
    async fn purge_read_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64>;

    /// Check that the backend is reachable.
    async fn ping(&self) -> DbResult<()>;

    /// Short backend name for health output.
    fn backend(&self) -> &'static str;
}

/// Shared handle to whichever store the process runs with.
pub type DbPool = Arc<dyn NotificationStore>;
