//! Inbound push-event types.
//!
//! One variant per event category the transport delivers. The transport owns
//! framing and delivery order; these types only describe the decoded payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Message;
use crate::value_objects::{MessageId, ReactionKind, UserId, UserStatus};

/// Logical connection state as reported by the transport.
///
/// `Error` is not terminal: a later successful handshake moves the
/// connection back to `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl ConnectionStatus {
    /// Get the wire representation of the status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }

    /// Check if the transport is usable right now
    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a reaction event adds or removes a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionAction {
    Added,
    Removed,
}

/// TYPING event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingEvent {
    pub sender_id: UserId,
    pub is_typing: bool,
}

/// STATUS_UPDATE event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub user_id: UserId,
    pub status: UserStatus,
    /// When the service observed the status change. Absent on older
    /// server versions; the receiver stamps arrival time instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

/// REACTION event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub message_id: MessageId,
    pub reaction_kind: ReactionKind,
    pub user_id: UserId,
    pub action: ReactionAction,
}

/// CONNECTION_CHANGE event payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionChangeEvent {
    pub status: ConnectionStatus,
}

/// ERROR event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportErrorEvent {
    pub message: String,
}

/// All inbound event categories delivered over the push transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncEvent {
    NewMessage(Message),
    Typing(TypingEvent),
    StatusUpdate(StatusEvent),
    Reaction(ReactionEvent),
    ConnectionChange(ConnectionChangeEvent),
    Error(TransportErrorEvent),
}

impl SyncEvent {
    /// Get the event category name, for logging
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "NEW_MESSAGE",
            Self::Typing(_) => "TYPING",
            Self::StatusUpdate(_) => "STATUS_UPDATE",
            Self::Reaction(_) => "REACTION",
            Self::ConnectionChange(_) => "CONNECTION_CHANGE",
            Self::Error(_) => "ERROR",
        }
    }
}
