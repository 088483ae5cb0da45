//! In-process notification store.
//!
//! Used by tests and by `jobportal serve --memory` for local runs without
//! Redis. Nothing survives a restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::client::{DbError, DbResult};
use crate::store::{NotificationRow, NotificationStore};

#[derive(Default)]
struct Inner {
    rows: HashMap<String, Entry>,
    next_seq: u64,
}

struct Entry {
    seq: u64,
    row: NotificationRow,
}

/// Notification store held in a `HashMap` behind an async lock.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn apply_read(row: &mut NotificationRow, read_at: DateTime<Utc>) -> bool {
    if row.is_read {
        return false;
    }
    row.is_read = true;
    row.read_at = Some(read_at.to_rfc3339());
    true
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert(&self, row: &NotificationRow) -> DbResult<()> {
        // Reject rows whose timestamp the Redis backend could not score either.
        row.created_at_utc()?;
        let mut inner = self.inner.write().await;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.rows.insert(row.id.clone(), Entry { seq, row: row.clone() });
        Ok(())
    }

    async fn get(&self, id: &str) -> DbResult<Option<NotificationRow>> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(id).map(|e| e.row.clone()))
    }

    async fn list_by_owner(&self, owner: &str) -> DbResult<Vec<NotificationRow>> {
        let inner = self.inner.read().await;
        let mut keyed = Vec::new();
        for entry in inner.rows.values().filter(|e| e.row.owner == owner) {
            keyed.push((entry.row.created_at_utc()?, entry.seq, entry.row.clone()));
        }
        keyed.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));
        Ok(keyed.into_iter().map(|(_, _, row)| row).collect())
    }

    async fn count_unread(&self, owner: &str) -> DbResult<i64> {
        let inner = self.inner.read().await;
        let count = inner
            .rows
            .values()
            .filter(|e| e.row.owner == owner && !e.row.is_read)
            .count();
        Ok(count as i64)
    }

    async fn mark_read(&self, id: &str, read_at: DateTime<Utc>) -> DbResult<NotificationRow> {
        let mut inner = self.inner.write().await;
        let entry = inner
            .rows
            .get_mut(id)
            .ok_or_else(|| DbError::NotFound(format!("Notification not found: {}", id)))?;
        apply_read(&mut entry.row, read_at);
        Ok(entry.row.clone())
    }

    async fn mark_all_read(&self, owner: &str, read_at: DateTime<Utc>) -> DbResult<u64> {
        let mut inner = self.inner.write().await;
        let changed = inner
            .rows
            .values_mut()
            .filter(|e| e.row.owner == owner)
            .map(|e| apply_read(&mut e.row, read_at))
            .filter(|changed| *changed)
            .count();
        Ok(changed as u64)
    }

    async fn purge_read_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let mut inner = self.inner.write().await;
        let mut expired = Vec::new();
        for (id, entry) in &inner.rows {
            if let Some(read_at) = entry.row.read_at_utc()? {
                if read_at < cutoff {
                    expired.push(id.clone());
                }
            }
        }
        for id in &expired {
            inner.rows.remove(id);
        }
        Ok(expired.len() as u64)
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn row(id: &str, owner: &str, created_at: DateTime<Utc>) -> NotificationRow {
        NotificationRow {
            id: id.to_string(),
            owner: owner.to_string(),
            kind: "SYSTEM".to_string(),
            message: format!("message {}", id),
            related_id: None,
            is_read: false,
            created_at: created_at.to_rfc3339(),
            read_at: None,
        }
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.insert(&row("a", "u1", t0)).await.unwrap();
        store.insert(&row("b", "u1", t0 + Duration::seconds(5))).await.unwrap();
        store.insert(&row("c", "u1", t0 + Duration::seconds(1))).await.unwrap();
        store.insert(&row("x", "u2", t0 + Duration::seconds(9))).await.unwrap();

        let ids: Vec<String> = store
            .list_by_owner("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
    }

    #[tokio::test]
    async fn test_same_timestamp_keeps_insertion_order_reversed() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.insert(&row("first", "u1", t0)).await.unwrap();
        store.insert(&row("second", "u1", t0)).await.unwrap();

        let rows = store.list_by_owner("u1").await.unwrap();
        assert_eq!(rows[0].id, "second");
        assert_eq!(rows[1].id, "first");
    }

    #[tokio::test]
    async fn test_mark_read_sets_read_at_once() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.insert(&row("a", "u1", t0)).await.unwrap();

        let first = store.mark_read("a", t0 + Duration::seconds(1)).await.unwrap();
        let second = store.mark_read("a", t0 + Duration::seconds(60)).await.unwrap();
        assert!(first.is_read && second.is_read);
        assert_eq!(first.read_at, second.read_at);
        assert_eq!(store.count_unread("u1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mark_read_unknown_id() {
        let store = MemoryStore::new();
        let err = store.mark_read("missing", Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_all_read_scoped_to_owner() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.insert(&row("a", "u1", t0)).await.unwrap();
        store.insert(&row("b", "u1", t0)).await.unwrap();
        store.insert(&row("c", "u2", t0)).await.unwrap();

        assert_eq!(store.mark_all_read("u1", t0).await.unwrap(), 2);
        assert_eq!(store.mark_all_read("u1", t0).await.unwrap(), 0);
        assert_eq!(store.count_unread("u1").await.unwrap(), 0);
        assert_eq!(store.count_unread("u2").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_only_removes_old_read_rows() {
        let store = MemoryStore::new();
        let t0 = Utc::now();
        store.insert(&row("old-read", "u1", t0)).await.unwrap();
        store.insert(&row("new-read", "u1", t0)).await.unwrap();
        store.insert(&row("unread", "u1", t0 - Duration::days(90))).await.unwrap();
        store.mark_read("old-read", t0 - Duration::days(40)).await.unwrap();
        store.mark_read("new-read", t0).await.unwrap();

        let purged = store.purge_read_before(t0 - Duration::days(30)).await.unwrap();
        assert_eq!(purged, 1);
        assert!(store.get("old-read").await.unwrap().is_none());
        assert!(store.get("new-read").await.unwrap().is_some());
        assert!(store.get("unread").await.unwrap().is_some());
    }
}
