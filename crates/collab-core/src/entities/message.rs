//! Message entity - a direct message exchanged with another user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::value_objects::{MessageId, UserId};

/// Broad category of an attachment, used by the attachment-filtered query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentType {
    Image,
    Video,
    Audio,
    File,
}

impl AttachmentType {
    /// Get the wire representation of the type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::File => "file",
        }
    }
}

impl fmt::Display for AttachmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttachmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            "audio" => Ok(Self::Audio),
            "file" => Ok(Self::File),
            _ => Err(format!("unknown attachment type: {s}")),
        }
    }
}

/// A file attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    pub attachment_type: AttachmentType,
    pub url: String,
    #[serde(default)]
    pub size_bytes: u64,
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    pub sent_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edited_at: Option<DateTime<Utc>>,
    /// Message this one was forwarded from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded_from: Option<MessageId>,
}

impl Message {
    /// Create a new Message
    pub fn new(id: MessageId, sender_id: UserId, receiver_id: UserId, content: String) -> Self {
        Self {
            id,
            sender_id,
            receiver_id,
            content,
            attachments: Vec::new(),
            sent_at: Utc::now(),
            edited_at: None,
            forwarded_from: None,
        }
    }

    /// Attach a file to the message
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Check if message carries any attachments
    #[inline]
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Check if message carries an attachment of the given type
    pub fn has_attachment_of(&self, attachment_type: AttachmentType) -> bool {
        self.attachments
            .iter()
            .any(|a| a.attachment_type == attachment_type)
    }

    /// Check if message is a forward of another message
    #[inline]
    pub fn is_forwarded(&self) -> bool {
        self.forwarded_from.is_some()
    }

    /// Get a truncated preview of the message (for notifications)
    pub fn preview(&self, max_len: usize) -> &str {
        if self.content.len() <= max_len {
            &self.content
        } else {
            let mut end = max_len;
            while !self.content.is_char_boundary(end) && end > 0 {
                end -= 1;
            }
            &self.content[..end]
        }
    }
}

/// One page of a paginated message query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    /// Whether this is the final page
    pub last: bool,
}

impl MessagePage {
    /// An empty, final page
    #[must_use]
    pub fn empty() -> Self {
        Self {
            messages: Vec::new(),
            last: true,
        }
    }
}
