//! Inbound events pushed by the transport

mod sync_event;

pub use sync_event::{
    ConnectionChangeEvent, ConnectionStatus, ReactionAction, ReactionEvent, StatusEvent,
    SyncEvent, TransportErrorEvent, TypingEvent,
};
