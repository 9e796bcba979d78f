//! # collab-core
//!
//! Domain layer containing entities, value objects, inbound event types, and
//! the ports to the external transport and remote service. This crate has no
//! knowledge of how state is stored or how the orchestration layer is wired.

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Attachment, AttachmentType, Message, MessagePage, MessageStatistics};
pub use error::{ApiError, TransportError};
pub use events::{
    ConnectionChangeEvent, ConnectionStatus, ReactionAction, ReactionEvent, StatusEvent,
    SyncEvent, TransportErrorEvent, TypingEvent,
};
pub use traits::{ApiResult, PushTransport, RemoteApi};
pub use value_objects::{MessageId, ReactionKind, ReactionKindParseError, UserId, UserStatus};
