//! Transient on-screen toasts.
//!
//! Toasts dismiss themselves after a fixed duration. Hovering pauses the
//! countdown and leaving resumes it with whatever time was left. Time is
//! passed in by the caller so the queue can be driven by any clock.

use std::time::{Duration, Instant};

use jobportal_core::notification::model::Notification;

/// How long a toast stays up when nobody hovers it.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

pub type ToastId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: ToastId,
    pub level: ToastLevel,
    pub message: String,
    /// The pushed notification that raised this toast, if any.
    pub notification: Option<Notification>,
    remaining: Duration,
    running_since: Option<Instant>,
}

impl Toast {
    pub fn is_paused(&self) -> bool {
        self.running_since.is_none()
    }

    fn remaining_at(&self, now: Instant) -> Duration {
        match self.running_since {
            Some(since) => self.remaining.saturating_sub(now.saturating_duration_since(since)),
            None => self.remaining,
        }
    }
}

#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    duration: Duration,
    next_id: ToastId,
}

impl ToastQueue {
    pub fn new(duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            duration,
            next_id: 1,
        }
    }

    /// Show a toast for a pushed notification.
    pub fn notify(&mut self, notification: Notification, now: Instant) -> ToastId {
        let message = notification.message.clone();
        self.push(ToastLevel::Info, message, Some(notification), now)
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) -> ToastId {
        self.push(ToastLevel::Error, message.into(), None, now)
    }

    fn push(
        &mut self,
        level: ToastLevel,
        message: String,
        notification: Option<Notification>,
        now: Instant,
    ) -> ToastId {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            level,
            message,
            notification,
            remaining: self.duration,
            running_since: Some(now),
        });
        id
    }

    /// Pause the countdown of a hovered toast.
    pub fn hover(&mut self, id: ToastId, now: Instant) {
        if let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id) {
            toast.remaining = toast.remaining_at(now);
            toast.running_since = None;
        }
    }

    /// Resume the countdown when the pointer leaves.
    pub fn leave(&mut self, id: ToastId, now: Instant) {
        if let Some(toast) = self.toasts.iter_mut().find(|t| t.id == id) {
            if toast.running_since.is_none() {
                toast.running_since = Some(now);
            }
        }
    }

    pub fn dismiss(&mut self, id: ToastId) -> Option<Toast> {
        let index = self.toasts.iter().position(|t| t.id == id)?;
        Some(self.toasts.remove(index))
    }

    /// Drop expired toasts and return them.
    pub fn tick(&mut self, now: Instant) -> Vec<Toast> {
        let (expired, live) = std::mem::take(&mut self.toasts)
            .into_iter()
            .partition(|t| t.remaining_at(now).is_zero());
        self.toasts = live;
        expired
    }

    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}
