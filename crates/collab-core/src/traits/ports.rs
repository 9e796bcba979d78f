//! Ports (interfaces) to the transport adapter and the remote service.
//!
//! The sync engine consumes these; concrete adapters live outside this
//! workspace (the production transport, or the fakes used in tests). Both
//! ports are injected at engine construction, one engine per authenticated
//! session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::entities::{AttachmentType, Message, MessagePage, MessageStatistics};
use crate::error::{ApiError, TransportError};
use crate::events::SyncEvent;
use crate::value_objects::{MessageId, ReactionKind, UserId, UserStatus};

/// Result type for remote-service calls
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Push Transport
// ============================================================================

/// The push transport owning the physical connection.
///
/// Connection management, framing, reconnection, and authentication are the
/// adapter's concern; this core only subscribes to the decoded event feed.
#[async_trait]
pub trait PushTransport: Send + Sync {
    /// Register this session with the transport and obtain the inbound
    /// event feed. Each call returns an independent receiver; the engine
    /// calls this exactly once per initialization.
    async fn subscribe(&self) -> Result<broadcast::Receiver<SyncEvent>, TransportError>;

    /// Release the interest registered by `subscribe`.
    async fn unsubscribe(&self) -> Result<(), TransportError>;
}

// ============================================================================
// Remote Service
// ============================================================================

/// Request/response operations answered by the remote service.
///
/// All three paginated queries are caller-driven: `page`/`size` select one
/// window, and the returned page replaces any previous one wholesale.
#[async_trait]
pub trait RemoteApi: Send + Sync {
    /// Full-text search within one conversation
    async fn search_messages(
        &self,
        keyword: &str,
        with_user: &UserId,
        page: u32,
        size: u32,
    ) -> ApiResult<MessagePage>;

    /// Messages in one conversation carrying an attachment of the given type
    async fn messages_with_attachments(
        &self,
        with_user: &UserId,
        attachment_type: AttachmentType,
        page: u32,
        size: u32,
    ) -> ApiResult<MessagePage>;

    /// Messages in one conversation sent inside a date range
    async fn messages_by_date_range(
        &self,
        with_user: &UserId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        page: u32,
        size: u32,
    ) -> ApiResult<MessagePage>;

    /// Add own reaction to a message
    async fn add_reaction(&self, message_id: &MessageId, kind: ReactionKind) -> ApiResult<()>;

    /// Remove own reaction from a message
    async fn remove_reaction(&self, message_id: &MessageId, kind: ReactionKind) -> ApiResult<()>;

    /// Notify a peer of the local typing state. Returns whether the peer
    /// was reachable.
    async fn send_typing(&self, receiver_id: &UserId, is_typing: bool) -> ApiResult<bool>;

    /// Update own presence status
    async fn update_status(&self, status: UserStatus) -> ApiResult<()>;

    /// Forward an existing message to another user, optionally with
    /// additional text. Returns the newly created message.
    async fn forward_message(
        &self,
        original_message_id: &MessageId,
        receiver_id: &UserId,
        additional_text: Option<&str>,
    ) -> ApiResult<Message>;

    /// Restore a soft-deleted message. Returns the restored message.
    async fn restore_message(&self, message_id: &MessageId) -> ApiResult<Message>;

    /// Aggregate statistics for one conversation over a date range
    async fn message_statistics(
        &self,
        with_user: &UserId,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> ApiResult<MessageStatistics>;

    /// Most recent messages across all conversations, newest first
    async fn recent_messages(&self, limit: u32) -> ApiResult<Vec<Message>>;
}
