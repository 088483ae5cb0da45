//! Notification domain models.

use jobportal_db::NotificationRow;
use serde::{Deserialize, Serialize};

/// Notification category.
///
/// Unrecognized categories are kept verbatim so newer producers do not break
/// older clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    System,
    NewApplication,
    JobAlert,
    Other(String),
}

impl NotificationKind {
    /// Parse from string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "SYSTEM" => Self::System,
            "NEW_APPLICATION" => Self::NewApplication,
            "JOB_ALERT" => Self::JobAlert,
            other => Self::Other(other.to_string()),
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "SYSTEM",
            Self::NewApplication => "NEW_APPLICATION",
            Self::JobAlert => "JOB_ALERT",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

/// A notification as exchanged with clients.
///
/// Push payloads may be minimal (`message`, `type`, `relatedId`), so every
/// server-assigned field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_at: Option<String>,
}

impl Notification {
    /// Create a Notification from a database row.
    pub fn from_row(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            owner: row.owner,
            kind: NotificationKind::from_str(&row.kind),
            message: row.message,
            related_id: row.related_id,
            is_read: row.is_read,
            created_at: row.created_at,
            read_at: row.read_at,
        }
    }
}

/// Response body of a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

/// A server-side business event asking for a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    /// Identity, or `admin` for every administrator.
    pub recipient: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    #[serde(default)]
    pub related_id: Option<String>,
}
