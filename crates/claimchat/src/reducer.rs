//! The event reducer: the only code that mutates a [`MessageLog`].
//!
//! Applying an event never fails. Unknown or malformed events, denied
//! deletes, deletes of missing messages and repeated deletes all leave the log
//! as it was. Applying the same ordered events to an empty log always yields
//! the same log, which is what makes history replay safe.

use claimchat_auth::{authorize_delete, DeleteDecision};
use claimchat_core::{ChannelEvent, ChatEvent, Message};

use crate::log::MessageLog;

/// What applying one event did to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// A new message was appended.
    Appended,
    /// A send whose id is already in the log (redelivery). Ignored.
    DuplicateSend,
    /// The target was soft-deleted.
    Deleted(DeleteDecision),
    /// The gate refused the delete.
    DeleteDenied,
    /// No message with the target id.
    TargetMissing,
    /// The target was already deleted.
    AlreadyDeleted,
    /// The log was emptied.
    Cleared,
}

impl Applied {
    /// Whether the log changed.
    pub fn changed(self) -> bool {
        matches!(
            self,
            Applied::Appended | Applied::Deleted(_) | Applied::Cleared
        )
    }
}

impl MessageLog {
    /// Apply one event in place.
    pub fn apply(&mut self, event: &ChatEvent) -> Applied {
        match event {
            ChatEvent::Send { id, message } => {
                if self.push(Message::from_draft(id.clone(), message.clone())) {
                    Applied::Appended
                } else {
                    Applied::DuplicateSend
                }
            }
            ChatEvent::Delete {
                user,
                target,
                claim,
            } => {
                let Some(message) = self.get_mut(target) else {
                    return Applied::TargetMissing;
                };
                if message.is_deleted() {
                    return Applied::AlreadyDeleted;
                }
                match authorize_delete(message, user, claim.as_ref()) {
                    DeleteDecision::Denied => Applied::DeleteDenied,
                    decision => {
                        message.mark_deleted();
                        Applied::Deleted(decision)
                    }
                }
            }
            ChatEvent::Clear => {
                self.clear();
                Applied::Cleared
            }
        }
    }
}

/// `apply(log, event) -> log'`.
pub fn apply(mut log: MessageLog, event: &ChatEvent) -> MessageLog {
    log.apply(event);
    log
}

/// Fold events, in order, into a fresh log.
pub fn fold<'a>(events: impl IntoIterator<Item = &'a ChatEvent>) -> MessageLog {
    events.into_iter().fold(MessageLog::new(), apply)
}

/// Decode a delivered event and apply it.
///
/// Returns `None` when the event could not be decoded; the log is untouched.
pub fn ingest(log: &mut MessageLog, event: &ChannelEvent) -> Option<Applied> {
    let chat_event = match ChatEvent::decode(event) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!(id = %event.id, name = %event.name, error = %e, "ignoring event");
            return None;
        }
    };

    let applied = log.apply(&chat_event);
    match applied {
        Applied::DeleteDenied => {
            tracing::debug!(
                id = %event.id,
                claim = ?event.user_claim,
                "delete denied by claim check"
            );
        }
        Applied::DuplicateSend => {
            tracing::debug!(id = %event.id, "ignoring redelivered send");
        }
        _ => {}
    }
    Some(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimchat_core::{Claim, MessageDraft, MessageId};
    use serde_json::json;

    fn send(id: &str, author: &str) -> ChatEvent {
        ChatEvent::Send {
            id: MessageId::new(id),
            message: MessageDraft::new(author, format!("from {author}"), 0),
        }
    }

    fn delete(target: &str, user: &str, claim: Option<&str>) -> ChatEvent {
        ChatEvent::Delete {
            user: user.to_string(),
            target: MessageId::new(target),
            claim: claim.map(Claim::new),
        }
    }

    #[test]
    fn test_send_appends_with_channel_id() {
        let log = fold(&[send("1", "alice"), send("2", "bob")]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[1].id().as_str(), "2");
        assert_eq!(log.messages()[1].author(), "bob");
    }

    #[test]
    fn test_owner_delete() {
        let mut log = fold(&[send("1", "alice")]);
        assert_eq!(
            log.apply(&delete("1", "alice", Some("user"))),
            Applied::Deleted(DeleteDecision::Owner)
        );
        assert!(log.messages()[0].is_deleted());
    }

    #[test]
    fn test_other_user_delete_denied() {
        let mut log = fold(&[send("1", "alice")]);
        let before = log.clone();
        assert_eq!(
            log.apply(&delete("1", "bob", Some("user"))),
            Applied::DeleteDenied
        );
        assert_eq!(log, before);
    }

    #[test]
    fn test_moderator_delete_of_others() {
        let mut log = fold(&[send("1", "alice")]);
        assert_eq!(
            log.apply(&delete("1", "bob", Some("moderator"))),
            Applied::Deleted(DeleteDecision::Moderator)
        );
    }

    #[test]
    fn test_delete_missing_target_is_noop() {
        let mut log = fold(&[send("1", "alice")]);
        let before = log.clone();
        assert_eq!(
            log.apply(&delete("404", "alice", Some("moderator"))),
            Applied::TargetMissing
        );
        assert_eq!(log, before);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let once = fold(&[send("1", "alice"), delete("1", "alice", Some("user"))]);
        let mut twice = once.clone();
        assert_eq!(
            twice.apply(&delete("1", "alice", Some("user"))),
            Applied::AlreadyDeleted
        );
        assert_eq!(once, twice);
    }

    #[test]
    fn test_delete_only_touches_target() {
        let log = fold(&[
            send("1", "alice"),
            send("2", "alice"),
            delete("1", "alice", Some("user")),
        ]);
        assert!(log.messages()[0].is_deleted());
        assert!(!log.messages()[1].is_deleted());
        assert_eq!(log.messages()[0].content(), "from alice");
    }

    #[test]
    fn test_clear_resets() {
        let log = fold(&[send("1", "alice"), ChatEvent::Clear, send("2", "bob")]);
        assert_eq!(log, fold(&[send("2", "bob")]));
    }

    #[test]
    fn test_duplicate_send_ignored() {
        let mut log = fold(&[send("1", "alice")]);
        assert_eq!(log.apply(&send("1", "mallory")), Applied::DuplicateSend);
        assert_eq!(log.messages()[0].author(), "alice");
    }

    #[test]
    fn test_ingest_keeps_send_with_odd_timestamp() {
        let mut log = MessageLog::new();
        let iso = ChannelEvent {
            name: "send".into(),
            id: MessageId::new("1"),
            data: json!({
                "message": { "author": "a", "content": "hi", "timestamp": "2024-01-01T00:00:00.000Z" }
            }),
            user_claim: Some(Claim::new("user")),
        };
        let untimed = ChannelEvent {
            name: "send".into(),
            id: MessageId::new("2"),
            data: json!({ "message": { "author": "a", "content": "again" } }),
            user_claim: Some(Claim::new("user")),
        };

        assert_eq!(ingest(&mut log, &iso), Some(Applied::Appended));
        assert_eq!(ingest(&mut log, &untimed), Some(Applied::Appended));
        assert_eq!(log.len(), 2);
        assert_eq!(log.messages()[1].timestamp(), 0);
    }

    #[test]
    fn test_ingest_ignores_unknown_and_malformed() {
        let mut log = MessageLog::new();
        let unknown = ChannelEvent {
            name: "typing".into(),
            id: MessageId::new("1"),
            data: json!({}),
            user_claim: None,
        };
        let malformed = ChannelEvent {
            name: "send".into(),
            id: MessageId::new("2"),
            data: json!({ "body": "x" }),
            user_claim: None,
        };

        assert_eq!(ingest(&mut log, &unknown), None);
        assert_eq!(ingest(&mut log, &malformed), None);
        assert!(log.is_empty());
    }

    #[test]
    fn test_ingest_uses_transport_claim() {
        let mut log = fold(&[send("1", "alice")]);
        let forged = ChannelEvent {
            name: "delete".into(),
            id: MessageId::new("2"),
            data: json!({
                "user": "mallory",
                "userClaim": "moderator",
                "extras": {
                    "userClaim": "moderator",
                    "ref": { "type": "delete-reference", "timeserial": "1" }
                }
            }),
            user_claim: Some(Claim::new("user")),
        };

        assert_eq!(ingest(&mut log, &forged), Some(Applied::DeleteDenied));
        assert!(!log.messages()[0].is_deleted());
    }
}
