//! Proptest generators for property-based testing.
//!
//! Event ids are assigned by position: the event at index `i` gets serial
//! `i + 1`, the same way the in-memory hub numbers what it sequences.

use proptest::prelude::*;
use serde_json::json;

use claimchat_core::{
    names, ChannelEvent, ChatEvent, Claim, DeletePayload, MessageDraft, MessageId, SendPayload,
};

/// A small pool of authors so deletes often target their own messages.
pub fn author() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("alice".to_string()),
        Just("bob".to_string()),
        Just("carol".to_string()),
        "[a-z]{1,8}".prop_map(String::from),
    ]
}

/// A transport claim, including absent and unrecognised ones.
pub fn claim() -> impl Strategy<Value = Option<Claim>> {
    prop_oneof![
        Just(None),
        Just(Some(Claim::new("user"))),
        Just(Some(Claim::new("moderator"))),
        "[a-z]{1,8}".prop_map(|s| Some(Claim::new(s))),
    ]
}

/// Generate a reasonable timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=1_700_000_000_000i64
}

pub fn draft() -> impl Strategy<Value = MessageDraft> {
    (author(), "[ -~]{0,40}", timestamp())
        .prop_map(|(author, content, ts)| MessageDraft::new(author, content, ts))
}

/// Only `send` events, with distinct ids.
pub fn sends(max_len: usize) -> impl Strategy<Value = Vec<ChatEvent>> {
    prop::collection::vec(draft(), 0..=max_len).prop_map(|drafts| {
        drafts
            .into_iter()
            .enumerate()
            .map(|(i, message)| ChatEvent::Send {
                id: serial_id(i),
                message,
            })
            .collect()
    })
}

#[derive(Debug, Clone)]
enum Step {
    Send(MessageDraft),
    Delete {
        user: String,
        target: usize,
        claim: Option<Claim>,
    },
    Clear,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => draft().prop_map(Step::Send),
        4 => (author(), any::<usize>(), claim())
            .prop_map(|(user, target, claim)| Step::Delete { user, target, claim }),
        1 => Just(Step::Clear),
    ]
}

/// Mixed sends, deletes and clears. Deletes target an earlier serial, which
/// may or may not be a message.
pub fn chat_events(max_len: usize) -> impl Strategy<Value = Vec<ChatEvent>> {
    prop::collection::vec(step(), 0..=max_len).prop_map(|steps| {
        steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| match step {
                Step::Send(message) => ChatEvent::Send {
                    id: serial_id(i),
                    message,
                },
                Step::Delete {
                    user,
                    target,
                    claim,
                } => ChatEvent::Delete {
                    user,
                    target: serial_id(target % (i + 1)),
                    claim,
                },
                Step::Clear => ChatEvent::Clear,
            })
            .collect()
    })
}

fn serial_id(index: usize) -> MessageId {
    MessageId::from_serial(index as u64 + 1)
}

/// The channel event a hub would deliver for `event` at position `index`.
pub fn to_channel_event(index: usize, event: &ChatEvent) -> ChannelEvent {
    match event {
        ChatEvent::Send { id, message } => ChannelEvent {
            name: names::SEND.to_string(),
            id: id.clone(),
            data: SendPayload::new(message.clone()).to_value(),
            user_claim: Some(Claim::new("user")),
        },
        ChatEvent::Delete {
            user,
            target,
            claim,
        } => ChannelEvent {
            name: names::DELETE.to_string(),
            id: serial_id(index),
            data: DeletePayload::new(user.clone(), target.clone()).to_value(),
            user_claim: claim.clone(),
        },
        ChatEvent::Clear => ChannelEvent {
            name: names::CLEAR.to_string(),
            id: serial_id(index),
            data: json!({}),
            user_claim: None,
        },
    }
}

/// Channel events in chronological order.
pub fn to_channel_events(events: &[ChatEvent]) -> Vec<ChannelEvent> {
    events
        .iter()
        .enumerate()
        .map(|(i, e)| to_channel_event(i, e))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimchat::{can_delete, fold, replay, MessageLog};

    proptest! {
        #[test]
        fn test_log_length_equals_sends(events in sends(32)) {
            let log = fold(&events);

            prop_assert_eq!(log.len(), events.len());
            for (message, event) in log.iter().zip(&events) {
                let ChatEvent::Send { id, .. } = event else { unreachable!() };
                prop_assert_eq!(message.id(), id);
            }
        }

        #[test]
        fn test_fold_is_deterministic(events in chat_events(48)) {
            prop_assert_eq!(fold(&events), fold(&events));
        }

        #[test]
        fn test_delete_is_idempotent(
            events in chat_events(32),
            user in author(),
            target in any::<usize>(),
            claim in claim(),
        ) {
            let delete = ChatEvent::Delete {
                user,
                target: serial_id(target % (events.len() + 1)),
                claim,
            };
            let mut once = fold(&events);
            once.apply(&delete);
            let mut twice = once.clone();
            twice.apply(&delete);

            prop_assert_eq!(once, twice);
        }

        #[test]
        fn test_user_claim_never_deletes_others(
            events in sends(16),
            user in author(),
            target in any::<usize>(),
        ) {
            prop_assume!(!events.is_empty());
            let target = serial_id(target % events.len());
            let before = fold(&events);
            let message = before.get(&target).unwrap().clone();
            prop_assume!(message.author() != user);

            let mut after = before.clone();
            after.apply(&ChatEvent::Delete {
                user,
                target,
                claim: Some(Claim::new("user")),
            });

            prop_assert_eq!(after, before);
        }

        #[test]
        fn test_moderator_claim_always_deletes(
            events in sends(16),
            user in author(),
            target in any::<usize>(),
        ) {
            prop_assume!(!events.is_empty());
            let target = serial_id(target % events.len());
            let mut log = fold(&events);
            prop_assert!(can_delete(log.get(&target).unwrap(), &user, Some(&Claim::new("moderator"))));

            log.apply(&ChatEvent::Delete {
                user,
                target: target.clone(),
                claim: Some(Claim::new("moderator")),
            });

            prop_assert!(log.get(&target).unwrap().is_deleted());
        }

        #[test]
        fn test_replay_then_live_equals_fold(events in chat_events(48), split in any::<usize>()) {
            let split = split % (events.len() + 1);
            let channel_events = to_channel_events(&events);

            let mut history: Vec<_> = channel_events[..split].to_vec();
            history.reverse();
            let mut log = replay(&history);
            for event in &channel_events[split..] {
                claimchat::ingest(&mut log, event);
            }

            prop_assert_eq!(log, fold(&events));
        }

        #[test]
        fn test_clear_then_sends_equals_fresh(
            before in chat_events(16),
            after in sends(16),
        ) {
            let mut log = fold(&before);
            log.apply(&ChatEvent::Clear);
            for event in &after {
                log.apply(event);
            }

            prop_assert_eq!(log, fold(&after));
        }

        #[test]
        fn test_deleted_never_undeleted(events in chat_events(48)) {
            let mut log = MessageLog::new();
            for event in &events {
                let deleted_before: Vec<_> = log
                    .iter()
                    .filter(|m| m.is_deleted())
                    .map(|m| m.id().clone())
                    .collect();
                log.apply(event);
                if matches!(event, ChatEvent::Clear) {
                    continue;
                }
                for id in deleted_before {
                    prop_assert!(log.get(&id).unwrap().is_deleted());
                }
            }
        }
    }
}
