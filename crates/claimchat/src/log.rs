//! The message log.
//!
//! An ordered collection of messages in channel arrival order. Readers get the
//! full public API; mutation is crate-private and only the reducer calls it.

use std::collections::HashMap;

use claimchat_core::{Message, MessageId};

/// Ordered, append-mostly log of chat messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    /// Insertion order is arrival order.
    messages: Vec<Message>,
    /// Index: message id -> position in `messages`.
    positions: HashMap<MessageId, usize>,
}

impl MessageLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// All messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.positions.get(id).map(|&i| &self.messages[i])
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.positions.contains_key(id)
    }

    /// Messages that have not been deleted.
    pub fn live(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_deleted())
    }

    /// Append a message. Returns `false`, leaving the log as it was, if the id
    /// is already present.
    pub(crate) fn push(&mut self, message: Message) -> bool {
        if self.positions.contains_key(message.id()) {
            return false;
        }
        self.positions
            .insert(message.id().clone(), self.messages.len());
        self.messages.push(message);
        true
    }

    pub(crate) fn get_mut(&mut self, id: &MessageId) -> Option<&mut Message> {
        let index = *self.positions.get(id)?;
        self.messages.get_mut(index)
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
        self.positions.clear();
    }
}

impl<'a> IntoIterator for &'a MessageLog {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimchat_core::MessageDraft;

    fn msg(id: &str, author: &str) -> Message {
        Message::from_draft(MessageId::new(id), MessageDraft::new(author, "text", 0))
    }

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut log = MessageLog::new();
        assert!(log.push(msg("9", "a")));
        assert!(log.push(msg("1", "b")));

        let ids: Vec<_> = log.iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, vec!["9", "1"]);
    }

    #[test]
    fn test_push_rejects_duplicate_id() {
        let mut log = MessageLog::new();
        assert!(log.push(msg("1", "a")));
        assert!(!log.push(msg("1", "b")));
        assert_eq!(log.len(), 1);
        assert_eq!(log.get(&MessageId::new("1")).unwrap().author(), "a");
    }

    #[test]
    fn test_clear_empties_index_too() {
        let mut log = MessageLog::new();
        log.push(msg("1", "a"));
        log.clear();
        assert!(log.is_empty());
        assert!(!log.contains(&MessageId::new("1")));
        assert!(log.push(msg("1", "a")));
    }

    #[test]
    fn test_live_skips_deleted() {
        let mut log = MessageLog::new();
        log.push(msg("1", "a"));
        log.push(msg("2", "b"));
        log.get_mut(&MessageId::new("1")).unwrap().mark_deleted();

        let live: Vec<_> = log.live().map(|m| m.id().as_str()).collect();
        assert_eq!(live, vec!["2"]);
    }
}
