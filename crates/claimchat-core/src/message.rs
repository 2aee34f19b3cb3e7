//! Chat messages.
//!
//! A [`MessageDraft`] is what a client publishes. A [`Message`] is what ends up
//! in the log once the channel has assigned it an id. Author and content are
//! private so nothing outside this module can edit them; the only mutation is
//! the one-way soft delete.

use chrono::DateTime;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::MessageId;

/// Text shown in place of a soft-deleted message.
pub const DELETED_PLACEHOLDER: &str = "This message has been deleted.";

/// The body of a `send` event as published by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDraft {
    /// Display identity chosen by the sender. Not authenticated.
    pub author: String,

    /// Message body.
    pub content: String,

    /// Client-recorded creation time (Unix milliseconds). Advisory only.
    ///
    /// Decoded leniently: integers, RFC 3339 strings (what JavaScript clients
    /// send for a `Date`) and numeric strings are accepted; anything else,
    /// including a missing field, reads as 0.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: i64,
}

impl MessageDraft {
    pub fn new(author: impl Into<String>, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            timestamp,
        }
    }

    /// Draft stamped with the current wall-clock time.
    pub fn now(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(author, content, now_millis())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Millis(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let millis = match WireTimestamp::deserialize(deserializer)? {
        WireTimestamp::Millis(ms) => ms,
        WireTimestamp::Float(ms) if ms.is_finite() => ms as i64,
        WireTimestamp::Text(text) => DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.timestamp_millis())
            .ok()
            .or_else(|| text.parse().ok())
            .unwrap_or(0),
        WireTimestamp::Float(_) | WireTimestamp::Other(_) => 0,
    };
    Ok(millis)
}

/// A message in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    id: MessageId,
    author: String,
    content: String,
    timestamp: i64,
    deleted: bool,
}

impl Message {
    /// Build a message from a published draft and its channel-assigned id.
    pub fn from_draft(id: MessageId, draft: MessageDraft) -> Self {
        Self {
            id,
            author: draft.author,
            content: draft.content,
            timestamp: draft.timestamp,
            deleted: false,
        }
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// The original content, even when deleted.
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Content as it should be shown to readers.
    pub fn display_content(&self) -> &str {
        if self.deleted {
            DELETED_PLACEHOLDER
        } else {
            &self.content
        }
    }

    /// Soft-delete the message.
    ///
    /// Returns `true` if this call changed the flag. There is no way back.
    pub fn mark_deleted(&mut self) -> bool {
        if self.deleted {
            return false;
        }
        self.deleted = true;
        true
    }
}

/// Current time in Unix milliseconds.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
