//! Request DTOs for the engine's query operations.
//!
//! All query DTOs implement `Deserialize` and `Validate`; the engine checks
//! them before any network call so malformed requests never round-trip.

use chrono::{DateTime, Utc};
use collab_core::{AttachmentType, UserId};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

fn default_size() -> u32 {
    0 // 0 means "use the engine's configured default page size"
}

/// Keyword search within one conversation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(min = 1, message = "Search keyword must not be empty"))]
    pub keyword: String,

    pub with_user: UserId,

    #[serde(default)]
    pub page: u32,

    #[serde(default = "default_size")]
    pub size: u32,
}

impl SearchQuery {
    /// Convenience constructor for the first page
    pub fn new(keyword: impl Into<String>, with_user: UserId) -> Self {
        Self {
            keyword: keyword.into(),
            with_user,
            page: 0,
            size: default_size(),
        }
    }
}

/// Attachment-filtered fetch within one conversation
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AttachmentQuery {
    pub with_user: UserId,

    pub attachment_type: AttachmentType,

    #[serde(default)]
    pub page: u32,

    #[serde(default = "default_size")]
    pub size: u32,
}

impl AttachmentQuery {
    /// Convenience constructor for the first page
    pub fn new(with_user: UserId, attachment_type: AttachmentType) -> Self {
        Self {
            with_user,
            attachment_type,
            page: 0,
            size: default_size(),
        }
    }
}

/// Date-range fetch within one conversation.
///
/// `start_date <= end_date` is enforced by the engine, not by derive
/// validation, because it spans two fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DateRangeQuery {
    pub with_user: UserId,

    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,

    #[serde(default)]
    pub page: u32,

    #[serde(default = "default_size")]
    pub size: u32,
}

impl DateRangeQuery {
    /// Convenience constructor for the first page
    pub fn new(with_user: UserId, start_date: DateTime<Utc>, end_date: DateTime<Utc>) -> Self {
        Self {
            with_user,
            start_date,
            end_date,
            page: 0,
            size: default_size(),
        }
    }
}

/// Flatten derive-validation errors into one human-readable line
pub(crate) fn validation_message(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = Vec::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            match &error.message {
                Some(message) => parts.push(message.to_string()),
                None => parts.push(format!("invalid value for {field}")),
            }
        }
    }
    if parts.is_empty() {
        "invalid request".to_string()
    } else {
        parts.join("; ")
    }
}
