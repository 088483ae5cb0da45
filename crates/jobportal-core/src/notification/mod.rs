//! Notification read-state operations.

pub mod model;

use chrono::{Duration, Utc};
use jobportal_db::{DbError, DbPool, NotificationRow};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{PortalError, PortalResult};
use crate::identity::{Identity, Recipient};
use model::{NewNotification, Notification, NotificationList};

/// Default number of days a read notification is kept.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Persist a new notification. Returns it with the recipient it targets so
/// the caller can emit it on the push channel.
pub async fn create_notification(
    pool: &DbPool,
    new: &NewNotification,
) -> PortalResult<(Recipient, Notification)> {
    let recipient = Recipient::parse(&new.recipient)?;
    let message = new.message.trim();
    if message.is_empty() {
        return Err(PortalError::validation("message is required"));
    }

    let row = NotificationRow {
        id: Uuid::new_v4().to_string(),
        owner: recipient.owner().to_string(),
        kind: new.kind.as_str().to_string(),
        message: message.to_string(),
        related_id: new
            .related_id
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string),
        is_read: false,
        created_at: Utc::now().to_rfc3339(),
        read_at: None,
    };
    pool.insert(&row).await?;

    info!(
        notification_id = %row.id,
        owner = %row.owner,
        kind = %row.kind,
        "Notification created"
    );
    Ok((recipient, Notification::from_row(row)))
}

/// Fetch every notification visible to `identity`, newest first.
pub async fn list_notifications(pool: &DbPool, identity: &Identity) -> PortalResult<NotificationList> {
    let mut keyed = Vec::new();
    for owner in identity.owners() {
        for row in pool.list_by_owner(&owner).await? {
            keyed.push((row.created_at_utc()?, row));
        }
    }
    // Each owner list is already newest first; a stable sort merges them.
    keyed.sort_by(|a, b| b.0.cmp(&a.0));

    let notifications: Vec<Notification> = keyed
        .into_iter()
        .map(|(_, row)| Notification::from_row(row))
        .collect();
    let unread_count = notifications.iter().filter(|n| !n.is_read).count() as i64;

    debug!(identity = %identity.id, total = notifications.len(), unread_count, "Listed notifications");
    Ok(NotificationList {
        notifications,
        unread_count,
    })
}

/// Number of unread notifications visible to `identity`.
pub async fn unread_count(pool: &DbPool, identity: &Identity) -> PortalResult<i64> {
    let mut total = 0;
    for owner in identity.owners() {
        total += pool.count_unread(&owner).await?;
    }
    Ok(total)
}

/// Mark one notification read.
///
/// Unknown ids and ids owned by someone else fail identically, so callers
/// cannot probe for other users' notifications. Already-read notifications
/// are returned unchanged.
pub async fn mark_read(pool: &DbPool, identity: &Identity, id: &str) -> PortalResult<Notification> {
    let row = pool
        .get(id)
        .await?
        .filter(|row| identity.owns(&row.owner))
        .ok_or_else(|| PortalError::NotificationNotFound(id.to_string()))?;

    if row.is_read {
        return Ok(Notification::from_row(row));
    }

    let updated = pool.mark_read(id, Utc::now()).await.map_err(|e| match e {
        DbError::NotFound(_) => PortalError::NotificationNotFound(id.to_string()),
        other => PortalError::Database(other),
    })?;

    debug!(identity = %identity.id, notification_id = %id, "Notification marked read");
    Ok(Notification::from_row(updated))
}

/// Mark every notification owned by `identity` read. Returns how many
/// changed.
pub async fn mark_all_read(pool: &DbPool, identity: &Identity) -> PortalResult<u64> {
    let now = Utc::now();
    let mut changed = 0;
    for owner in identity.owners() {
        changed += pool.mark_all_read(&owner, now).await?;
    }
    info!(identity = %identity.id, changed, "Marked all notifications read");
    Ok(changed)
}

/// Delete read notifications older than `retention_days`.
pub async fn purge_expired(pool: &DbPool, retention_days: i64) -> PortalResult<u64> {
    if retention_days < 1 {
        return Err(PortalError::validation("retention must be at least one day"));
    }
    let cutoff = Utc::now() - Duration::days(retention_days);
    let purged = pool.purge_read_before(cutoff).await?;
    if purged > 0 {
        info!(purged, retention_days, "Purged expired notifications");
    }
    Ok(purged)
}
