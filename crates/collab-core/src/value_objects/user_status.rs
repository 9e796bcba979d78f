//! User presence status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Presence status of a remote user.
///
/// The four named variants are the statuses the service emits today. Unknown
/// values are presentation metadata, not correctness-critical, so they are
/// carried through as opaque strings instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserStatus {
    /// User is online and active
    Online,
    /// User is away from keyboard
    Away,
    /// Do not disturb
    Busy,
    /// User is offline
    Offline,
    /// A status string this client does not recognize
    Other(String),
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Offline
    }
}

impl UserStatus {
    /// Parse a status string. Never fails; unrecognized values become
    /// [`UserStatus::Other`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "online" => Self::Online,
            "away" => Self::Away,
            "busy" => Self::Busy,
            "offline" => Self::Offline,
            _ => Self::Other(s.to_string()),
        }
    }

    /// Get the wire representation of the status
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Online => "online",
            Self::Away => "away",
            Self::Busy => "busy",
            Self::Offline => "offline",
            Self::Other(s) => s,
        }
    }

    /// Check if this status means the user is reachable right now
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for UserStatus {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<UserStatus> for String {
    fn from(status: UserStatus) -> Self {
        status.as_str().to_string()
    }
}
