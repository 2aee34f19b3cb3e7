//! Strong type definitions for claimchat.
//!
//! Identifiers are newtypes so a channel name can never be passed where a
//! message id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier assigned by the channel when an event is published.
///
/// Opaque to clients. The channel hands them out in arrival order, but the
/// message log never sorts by id: insertion order is the order of record.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Wrap a channel-assigned id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Build the id for the `serial`-th event on a channel.
    ///
    /// Zero-padded so lexical and numeric order agree.
    pub fn from_serial(serial: u64) -> Self {
        Self(format!("{serial:020}"))
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MessageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Name of the pub/sub channel a session is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identity a credential is issued to.
///
/// Distinct from a message author: the author is a display string the client
/// picks, the client id is what the credential issuer vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_serial_order_matches_string_order(a in any::<u64>(), b in any::<u64>()) {
            prop_assert_eq!(
                a.cmp(&b),
                MessageId::from_serial(a).cmp(&MessageId::from_serial(b))
            );
        }
    }

    #[test]
    fn test_serial_ids_order_lexically() {
        let a = MessageId::from_serial(9);
        let b = MessageId::from_serial(10);
        assert!(a < b);
        assert_eq!(a.as_str().len(), 20);
    }

    #[test]
    fn test_message_id_serializes_as_plain_string() {
        let id = MessageId::new("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
    }

    #[test]
    fn test_message_id_debug() {
        let id = MessageId::new("01");
        assert_eq!(format!("{:?}", id), "MessageId(01)");
    }
}
