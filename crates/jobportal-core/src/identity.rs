//! Identities, roles and push-channel rooms.

use serde::{Deserialize, Serialize};

use crate::error::{PortalError, PortalResult};

/// Owner value for notifications addressed to every administrator.
pub const ADMIN_OWNER: &str = "admin";

/// Room every administrator joins on connect.
pub const ADMIN_ROOM: &str = "admin-room";

/// Account role carried in the session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Employer,
    Admin,
}

impl Role {
    /// Parse from string. Unknown roles get the least privileged role.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "employer" => Self::Employer,
            "admin" => Self::Admin,
            _ => Self::Candidate,
        }
    }

    /// Convert to string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidate => "candidate",
            Self::Employer => "employer",
            Self::Admin => "admin",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub role: Role,
}

impl Identity {
    /// Build an identity, rejecting ids that collide with shared room names.
    pub fn new(id: impl Into<String>, role: Role) -> PortalResult<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(PortalError::unauthenticated("identity is empty"));
        }
        if is_reserved(trimmed) {
            return Err(PortalError::unauthenticated(format!(
                "identity '{}' is reserved",
                trimmed
            )));
        }
        Ok(Self {
            id: trimmed.to_string(),
            role,
        })
    }

    /// Rooms joined automatically on connect.
    pub fn rooms(&self) -> Vec<String> {
        let mut rooms = vec![self.id.clone()];
        if self.role.is_admin() {
            rooms.push(ADMIN_ROOM.to_string());
        }
        rooms
    }

    /// Owner keys whose notifications this identity may read and mark.
    pub fn owners(&self) -> Vec<String> {
        let mut owners = vec![self.id.clone()];
        if self.role.is_admin() {
            owners.push(ADMIN_OWNER.to_string());
        }
        owners
    }

    pub fn owns(&self, owner: &str) -> bool {
        owner == self.id || (self.role.is_admin() && owner == ADMIN_OWNER)
    }

    /// Whether a `join` request for `room` is allowed.
    pub fn may_join(&self, room: &str) -> bool {
        room == self.id || (self.role.is_admin() && room == ADMIN_ROOM)
    }
}

fn is_reserved(id: &str) -> bool {
    id.eq_ignore_ascii_case(ADMIN_OWNER) || id.eq_ignore_ascii_case(ADMIN_ROOM)
}

/// Target of a server-side notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    User(String),
    Admins,
}

impl Recipient {
    /// Parse a recipient: `admin` (or `admin-room`) addresses every
    /// administrator, anything else is an identity.
    pub fn parse(raw: &str) -> PortalResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PortalError::validation("recipient is required"));
        }
        if is_reserved(raw) {
            Ok(Self::Admins)
        } else {
            Ok(Self::User(raw.to_string()))
        }
    }

    /// Owner key persisted with the notification.
    pub fn owner(&self) -> &str {
        match self {
            Self::User(id) => id,
            Self::Admins => ADMIN_OWNER,
        }
    }

    /// Room the notification is emitted to.
    pub fn room(&self) -> &str {
        match self {
            Self::User(id) => id,
            Self::Admins => ADMIN_ROOM,
        }
    }
}
