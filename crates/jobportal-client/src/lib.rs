//! Job Portal notification client.
//!
//! HTTP and push-channel access to the notification server, plus the
//! client-side state a UI renders: the inbox and its toasts.

pub mod api;
pub mod error;
pub mod inbox;
pub mod push;
pub mod session;
pub mod toast;

pub use api::NotificationApi;
pub use error::{ClientError, ClientResult};
pub use inbox::Inbox;
pub use push::{spawn_push, PushUpdate};
pub use session::Session;
pub use toast::{Toast, ToastQueue};
