//! One signed-in user's notification view.
//!
//! Ties the HTTP API, the local inbox and the toast queue together and
//! applies the propagation rules: fetch failures keep the stale list, failed
//! writes raise an error toast, pushes raise a toast and trigger a refetch.

use std::time::Instant;

use jobportal_core::navigation::{destination_for, Destination};
use jobportal_core::notification::model::Notification;
use tracing::{debug, warn};

use crate::api::NotificationApi;
use crate::inbox::Inbox;
use crate::push::PushUpdate;
use crate::toast::{ToastId, ToastQueue};

pub struct Session {
    api: NotificationApi,
    inbox: Inbox,
    toasts: ToastQueue,
}

impl Session {
    pub fn new(api: NotificationApi) -> Self {
        Self::with_toasts(api, ToastQueue::default())
    }

    pub fn with_toasts(api: NotificationApi, toasts: ToastQueue) -> Self {
        Self {
            api,
            inbox: Inbox::new(),
            toasts,
        }
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    pub fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    pub fn api(&self) -> &NotificationApi {
        &self.api
    }

    /// Refetch the list. Returns false if the fetch failed and the previous
    /// list was kept.
    pub async fn refresh(&mut self) -> bool {
        match self.api.fetch().await {
            Ok(list) => {
                self.inbox.replace(list);
                debug!(
                    total = self.inbox.len(),
                    unread = self.inbox.unread_count(),
                    "Notifications refreshed"
                );
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch notifications, keeping previous list");
                false
            }
        }
    }

    /// React to the push channel.
    ///
    /// A pushed notification is shown as a toast only. The list itself comes
    /// from the refetch.
    pub async fn on_push(&mut self, update: PushUpdate, now: Instant) {
        match update {
            PushUpdate::Connected => {
                self.refresh().await;
            }
            PushUpdate::Notification(notification) => {
                self.toasts.notify(notification, now);
                self.refresh().await;
            }
            PushUpdate::Disconnected => {}
        }
    }

    pub async fn mark_read(&mut self, id: &str, now: Instant) -> bool {
        match self.api.mark_read(id).await {
            Ok(updated) => {
                self.inbox.apply(updated);
                true
            }
            Err(e) => {
                warn!(id = %id, error = %e, "Failed to mark notification read");
                self.toasts.error("Could not mark the notification as read", now);
                false
            }
        }
    }

    pub async fn mark_all_read(&mut self, now: Instant) -> bool {
        match self.api.mark_all_read().await {
            Ok(updated) => {
                self.inbox.mark_all_read();
                debug!(updated, "Marked all notifications read");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to mark all notifications read");
                self.toasts.error("Could not mark notifications as read", now);
                false
            }
        }
    }

    /// Click an entry in the list: mark it read and pick where to go.
    pub async fn click(&mut self, id: &str, now: Instant) -> Option<Destination> {
        let notification = self.inbox.get(id)?.clone();
        self.open(notification, now).await
    }

    /// Click a toast: dismiss it and behave like clicking its notification.
    pub async fn click_toast(&mut self, id: ToastId, now: Instant) -> Option<Destination> {
        let notification = self.toasts.dismiss(id)?.notification?;
        self.open(notification, now).await
    }

    async fn open(&mut self, notification: Notification, now: Instant) -> Option<Destination> {
        let unread = self
            .inbox
            .get(&notification.id)
            .is_some_and(|n| !n.is_read);
        if unread {
            self.mark_read(&notification.id, now).await;
        }
        destination_for(&notification)
    }
}
