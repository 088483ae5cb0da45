//! Client-side copy of the caller's notifications.
//!
//! The unread counter always equals the number of unread entries currently
//! held. It may lag behind the server until the next refetch.

use jobportal_core::notification::model::{Notification, NotificationList};

#[derive(Debug, Default, Clone)]
pub struct Inbox {
    notifications: Vec<Notification>,
    unread: usize,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the local copy with a fresh fetch.
    ///
    /// The counter is recomputed from the entries rather than taken from the
    /// server's `unreadCount`.
    pub fn replace(&mut self, list: NotificationList) {
        self.notifications = list.notifications;
        self.unread = self.notifications.iter().filter(|n| !n.is_read).count();
    }

    /// Merge the server's copy of a single entry.
    ///
    /// A read entry never reverts to unread locally.
    pub fn apply(&mut self, updated: Notification) {
        let Some(current) = self.notifications.iter_mut().find(|n| n.id == updated.id) else {
            return;
        };
        let was_read = current.is_read;
        *current = updated;
        current.is_read |= was_read;
        if !was_read && current.is_read {
            self.unread -= 1;
        }
    }

    /// Flip every entry to read. Returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let changed = self.unread;
        for n in self.notifications.iter_mut() {
            n.is_read = true;
        }
        self.unread = 0;
        changed
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.unread
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobportal_core::notification::model::NotificationKind;

    fn entry(id: &str, is_read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            owner: "u123".to_string(),
            kind: NotificationKind::System,
            message: format!("message {}", id),
            related_id: None,
            is_read,
            created_at: String::new(),
            read_at: None,
        }
    }

    fn recount(inbox: &Inbox) -> usize {
        inbox.notifications().iter().filter(|n| !n.is_read).count()
    }

    fn inbox_of(entries: Vec<Notification>) -> Inbox {
        let mut inbox = Inbox::new();
        inbox.replace(NotificationList {
            notifications: entries,
            // Deliberately wrong: the local counter must not trust it.
            unread_count: 99,
        });
        inbox
    }

    #[test]
    fn test_counter_tracks_entries() {
        let mut inbox = inbox_of(vec![entry("a", false), entry("b", true), entry("c", false)]);
        assert_eq!(inbox.unread_count(), 2);

        inbox.apply(entry("a", true));
        inbox.apply(entry("a", true));
        inbox.apply(entry("missing", true));
        assert_eq!(inbox.unread_count(), recount(&inbox));
        assert_eq!(inbox.unread_count(), 1);

        assert_eq!(inbox.mark_all_read(), 1);
        assert_eq!(inbox.unread_count(), 0);
        assert_eq!(recount(&inbox), 0);
        assert_eq!(inbox.len(), 3);
    }

    #[test]
    fn test_apply_never_reverts_read() {
        let mut inbox = inbox_of(vec![entry("a", true), entry("b", false)]);

        inbox.apply(entry("a", false));
        assert!(inbox.get("a").unwrap().is_read);

        inbox.apply(entry("b", true));
        assert!(inbox.get("b").unwrap().is_read);
        assert_eq!(inbox.unread_count(), recount(&inbox));
        assert_eq!(inbox.unread_count(), 0);

        inbox.apply(entry("zzz", true));
        assert_eq!(inbox.len(), 2);
    }
}
