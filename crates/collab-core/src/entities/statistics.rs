//! Aggregate statistics over a conversation window

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Messaging statistics for one conversation over a date range,
/// computed server-side and returned as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStatistics {
    pub total_messages: u64,
    pub sent: u64,
    pub received: u64,
    pub with_attachments: u64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

impl MessageStatistics {
    /// Check internal consistency of a server-reported window
    pub fn is_consistent(&self) -> bool {
        self.sent + self.received == self.total_messages && self.start_date <= self.end_date
    }
}
