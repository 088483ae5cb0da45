//! Notification queries against Redis.
//!
//! Key layout:
//! - `jobportal:notification:{id}` hash with `data` (JSON row) and `read_at`
//! - `jobportal:owner:{owner}:notifications` sorted set scored by creation millis
//! - `jobportal:owner:{owner}:unread` set of unread ids
//! - `jobportal:notifications:read` sorted set scored by read millis

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use tracing::debug;

use crate::client::{DbError, DbResult, RedisPool};
use crate::store::{NotificationRow, NotificationStore};

fn notification_key(id: &str) -> String {
    format!("jobportal:notification:{}", id)
}

fn owner_key(owner: &str) -> String {
    format!("jobportal:owner:{}:notifications", owner)
}

fn unread_key(owner: &str) -> String {
    format!("jobportal:owner:{}:unread", owner)
}

const READ_INDEX_KEY: &str = "jobportal:notifications:read";

/// Notification store backed by Redis.
#[derive(Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    async fn load(&self, id: &str) -> DbResult<Option<NotificationRow>> {
        let mut conn = self.pool.clone();
        let json: Option<String> = conn.hget(notification_key(id), "data").await?;
        match json {
            Some(j) => Ok(Some(serde_json::from_str(&j)?)),
            None => Ok(None),
        }
    }

    async fn delete_row(&self, row: &NotificationRow) -> DbResult<()> {
        let mut conn = self.pool.clone();
        let () = redis::pipe()
            .atomic()
            .del(notification_key(&row.id))
            .ignore()
            .zrem(owner_key(&row.owner), &row.id)
            .ignore()
            .srem(unread_key(&row.owner), &row.id)
            .ignore()
            .zrem(READ_INDEX_KEY, &row.id)
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    /// Mark one row read. The flag is true only for the call that stamped
    /// `read_at`.
    async fn mark_read_once(&self, id: &str, read_at: DateTime<Utc>) -> DbResult<(NotificationRow, bool)> {
        let mut row = self
            .load(id)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Notification not found: {}", id)))?;

        let mut conn = self.pool.clone();
        let key = notification_key(id);
        let stamp = read_at.to_rfc3339();

        // HSETNX makes the first reader win, so read_at is written once.
        let first: bool = conn.hset_nx(&key, "read_at", &stamp).await?;
        if first {
            row.is_read = true;
            row.read_at = Some(stamp);
            self.write_read_state(&row, read_at).await?;
            debug!(notification_id = %id, "Notification marked read");
        } else {
            let existing: Option<String> = conn.hget(&key, "read_at").await?;
            let stale = !row.is_read;
            row.is_read = true;
            row.read_at = existing.or(row.read_at);
            if stale {
                // read_at was stamped but the document and indexes were not.
                let stamped = row.read_at_utc()?.unwrap_or(read_at);
                self.write_read_state(&row, stamped).await?;
                debug!(notification_id = %id, "Repaired read state");
            }
        }
        Ok((row, first))
    }

    async fn write_read_state(&self, row: &NotificationRow, read_at: DateTime<Utc>) -> DbResult<()> {
        let mut conn = self.pool.clone();
        let () = redis::pipe()
            .atomic()
            .hset(notification_key(&row.id), "data", serde_json::to_string(row)?)
            .ignore()
            .srem(unread_key(&row.owner), &row.id)
            .ignore()
            .zadd(READ_INDEX_KEY, &row.id, read_at.timestamp_millis())
            .ignore()
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for RedisStore {
    async fn insert(&self, row: &NotificationRow) -> DbResult<()> {
        let score = row.created_at_utc()?.timestamp_millis();
        let key = notification_key(&row.id);
        let mut pipe = redis::pipe();
        pipe.atomic()
            .hset(&key, "data", serde_json::to_string(row)?)
            .ignore()
            .zadd(owner_key(&row.owner), &row.id, score)
            .ignore();
        if let Some(read_at) = &row.read_at {
            pipe.hset(&key, "read_at", read_at).ignore();
        }
        if row.is_read {
            let read_score = row.read_at_utc()?.unwrap_or_else(Utc::now).timestamp_millis();
            pipe.zadd(READ_INDEX_KEY, &row.id, read_score).ignore();
        } else {
            pipe.sadd(unread_key(&row.owner), &row.id).ignore();
        }

        let mut conn = self.pool.clone();
        let () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, id: &str) -> DbResult<Option<NotificationRow>> {
        self.load(id).await
    }

    async fn list_by_owner(&self, owner: &str) -> DbResult<Vec<NotificationRow>> {
        let mut conn = self.pool.clone();
        let ids: Vec<String> = conn.zrevrange(owner_key(owner), 0, -1).await?;
        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(row) = self.load(&id).await? {
                rows.push(row);
            }
        }
        Ok(rows)
    }

    async fn count_unread(&self, owner: &str) -> DbResult<i64> {
        let mut conn = self.pool.clone();
        let count: i64 = conn.scard(unread_key(owner)).await?;
        Ok(count)
    }

    async fn mark_read(&self, id: &str, read_at: DateTime<Utc>) -> DbResult<NotificationRow> {
        let (row, _) = self.mark_read_once(id, read_at).await?;
        Ok(row)
    }

    async fn mark_all_read(&self, owner: &str, read_at: DateTime<Utc>) -> DbResult<u64> {
        let mut conn = self.pool.clone();
        let ids: Vec<String> = conn.smembers(unread_key(owner)).await?;
        let mut changed = 0;
        for id in ids {
            match self.mark_read_once(&id, read_at).await {
                Ok((_, true)) => changed += 1,
                Ok((_, false)) => {}
                // Purged between SMEMBERS and the update; drop the stale index entry.
                Err(DbError::NotFound(_)) => {
                    conn.srem::<_, _, ()>(unread_key(owner), &id).await?;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(changed)
    }

    async fn purge_read_before(&self, cutoff: DateTime<Utc>) -> DbResult<u64> {
        let mut conn = self.pool.clone();
        let ids: Vec<String> = conn
            .zrangebyscore(READ_INDEX_KEY, "-inf", cutoff.timestamp_millis())
            .await?;
        let mut purged = 0;
        for id in ids {
            match self.load(&id).await? {
                Some(row) => {
                    self.delete_row(&row).await?;
                    purged += 1;
                }
                None => {
                    conn.zrem::<_, _, ()>(READ_INDEX_KEY, &id).await?;
                }
            }
        }
        Ok(purged)
    }

    async fn ping(&self) -> DbResult<()> {
        let mut conn = self.pool.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(DbError::OperationFailed(format!("unexpected PING reply: {}", pong)));
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_key_layout() {
        assert_eq!(notification_key("n1"), "jobportal:notification:n1");
        assert_eq!(owner_key("u123"), "jobportal:owner:u123:notifications");
        assert_eq!(unread_key("admin"), "jobportal:owner:admin:unread");
    }

    // The tests below need a live server and are skipped unless REDIS_URL
    // is set. Ids are unique per run so they can share a database.

    async fn redis_store() -> Option<RedisStore> {
        let url = std::env::var("REDIS_URL").ok()?;
        let pool = crate::client::connect(&url).await.expect("REDIS_URL is set but unreachable");
        Some(RedisStore::new(pool))
    }

    fn unique(name: &str) -> String {
        format!("test-{}-{}", name, uuid::Uuid::new_v4())
    }

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
    async fn test_redis_list_newest_first() {
        let Some(store) = redis_store().await else { return };
        let (u1, u2) = (unique("u1"), unique("u2"));
        let (a, b, c, x) = (unique("a"), unique("b"), unique("c"), unique("x"));
        let t0 = Utc::now();
        store.insert(&row(&a, &u1, t0)).await.unwrap();
        store.insert(&row(&b, &u1, t0 + Duration::seconds(5))).await.unwrap();
        store.insert(&row(&c, &u1, t0 + Duration::seconds(1))).await.unwrap();
        store.insert(&row(&x, &u2, t0 + Duration::seconds(9))).await.unwrap();

        let ids: Vec<String> = store
            .list_by_owner(&u1)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![b, c, a]);
        assert_eq!(store.count_unread(&u1).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_redis_mark_read_sets_read_at_once() {
        let Some(store) = redis_store().await else { return };
        let (owner, id) = (unique("u1"), unique("a"));
        let t0 = Utc::now();
        store.insert(&row(&id, &owner, t0)).await.unwrap();

        let first = store.mark_read(&id, t0 + Duration::seconds(1)).await.unwrap();
        let second = store.mark_read(&id, t0 + Duration::seconds(60)).await.unwrap();
        assert!(first.is_read && second.is_read);
        assert_eq!(first.read_at, second.read_at);
        assert_eq!(store.get(&id).await.unwrap().unwrap().read_at, first.read_at);
        assert_eq!(store.count_unread(&owner).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_redis_mark_read_unknown_id() {
        let Some(store) = redis_store().await else { return };
        let err = store.mark_read(&unique("missing"), Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_redis_mark_all_read_scoped_to_owner() {
        let Some(store) = redis_store().await else { return };
        let (u1, u2) = (unique("u1"), unique("u2"));
        let t0 = Utc::now();
        store.insert(&row(&unique("a"), &u1, t0)).await.unwrap();
        store.insert(&row(&unique("b"), &u1, t0)).await.unwrap();
        store.insert(&row(&unique("c"), &u2, t0)).await.unwrap();

        assert_eq!(store.mark_all_read(&u1, t0).await.unwrap(), 2);
        assert_eq!(store.mark_all_read(&u1, t0).await.unwrap(), 0);
        assert_eq!(store.count_unread(&u1).await.unwrap(), 0);
        assert_eq!(store.count_unread(&u2).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_redis_half_written_mark_is_repaired() {
        let Some(store) = redis_store().await else { return };
        let (owner, id) = (unique("u1"), unique("a"));
        let t0 = Utc::now();
        store.insert(&row(&id, &owner, t0)).await.unwrap();

        // read_at stamped, but the document and indexes never updated.
        let stamp = (t0 + Duration::seconds(3)).to_rfc3339();
        let mut conn = store.pool.clone();
        conn.hset::<_, _, _, ()>(notification_key(&id), "read_at", &stamp)
            .await
            .unwrap();
        assert_eq!(store.count_unread(&owner).await.unwrap(), 1);

        assert_eq!(store.mark_all_read(&owner, t0 + Duration::seconds(9)).await.unwrap(), 0);
        assert_eq!(store.count_unread(&owner).await.unwrap(), 0);
        let repaired = store.get(&id).await.unwrap().unwrap();
        assert!(repaired.is_read);
        assert_eq!(repaired.read_at.as_deref(), Some(stamp.as_str()));
        assert_eq!(store.mark_all_read(&owner, t0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_redis_purge_only_removes_old_read_rows() {
        let Some(store) = redis_store().await else { return };
        let owner = unique("u1");
        let (old_read, new_read, unread) = (unique("old-read"), unique("new-read"), unique("unread"));
        let t0 = Utc::now();
        store.insert(&row(&old_read, &owner, t0)).await.unwrap();
        store.insert(&row(&new_read, &owner, t0)).await.unwrap();
        store.insert(&row(&unread, &owner, t0 - Duration::days(90))).await.unwrap();
        store.mark_read(&old_read, t0 - Duration::days(40)).await.unwrap();
        store.mark_read(&new_read, t0).await.unwrap();

        // The read index is shared, so other old rows may go too.
        let purged = store.purge_read_before(t0 - Duration::days(30)).await.unwrap();
        assert!(purged >= 1);
        assert!(store.get(&old_read).await.unwrap().is_none());
        assert!(store.get(&new_read).await.unwrap().is_some());
        assert!(store.get(&unread).await.unwrap().is_some());
        let listed: Vec<String> = store
            .list_by_owner(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(listed, vec![new_read, unread]);
    }
}
