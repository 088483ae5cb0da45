//! Job Portal Core Library
//!
//! Notification domain model, identities and rooms, read-state operations
//! and client-side navigation rules.

pub mod auth;
pub mod error;
pub mod identity;
pub mod navigation;
pub mod notification;
pub mod push;

pub use error::{PortalError, PortalResult};
pub use identity::{Identity, Recipient, Role};
