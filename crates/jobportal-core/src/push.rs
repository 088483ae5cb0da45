//! Push channel wire events.
//!
//! Frames are JSON text messages shaped `{ "event": ..., "data": ... }`.

use serde::{Deserialize, Serialize};

use crate::notification::model::Notification;

/// Events sent by the server.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A notification was emitted to one of the connection's rooms.
    Notification(Notification),
    /// The connection is now a member of the room.
    Joined(String),
    /// A client request was refused or could not be parsed.
    Error(String),
}

/// Events sent by the client.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Ask to join a room: an identity or a role room such as `admin-room`.
    Join(String),
}

impl ServerEvent {
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_frame(frame: &str) -> serde_json::Result<Self> {
        serde_json::from_str(frame)
    }
}

impl ClientEvent {
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_frame(frame: &str) -> serde_json::Result<Self> {
        serde_json::from_str(frame)
    }
}
