//! History reconciliation at session start.
//!
//! The channel returns history newest first. Replay reverses it and folds it
//! through the same reducer live events use, so a late joiner ends up with the
//! log it would have had if it had been subscribed since the channel began.
//! An empty history is bootstrapped with a single seed message.

use claimchat_channel::EventChannel;
use claimchat_core::{names, ChannelEvent, MessageDraft, MessageId, SendPayload};

use crate::error::Result;
use crate::log::MessageLog;
use crate::reducer;

/// How the initial log was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// History was empty and a seed message was published.
    Seeded(MessageId),
    /// History was empty and seeding is disabled.
    Empty,
    /// This many history events were replayed.
    Replayed(usize),
}

/// Rebuild a log from newest-first history.
pub fn replay(history_newest_first: &[ChannelEvent]) -> MessageLog {
    let mut log = MessageLog::new();
    for event in history_newest_first.iter().rev() {
        reducer::ingest(&mut log, event);
    }
    log
}

/// Fetch history from `channel` and build the initial log.
///
/// When history is empty and `seed` is given, the seed is published and an
/// empty log returned; the seed arrives through the live subscription like
/// any other send.
pub async fn reconcile<C: EventChannel + ?Sized>(
    channel: &C,
    seed: Option<&MessageDraft>,
) -> Result<(MessageLog, Reconciliation)> {
    let history = channel.history().await?;

    if !history.is_empty() {
        let log = replay(&history);
        tracing::debug!(
            channel = %channel.channel_name(),
            events = history.len(),
            messages = log.len(),
            "replayed history"
        );
        return Ok((log, Reconciliation::Replayed(history.len())));
    }

    match seed {
        Some(draft) => {
            let payload = SendPayload::new(draft.clone()).to_value();
            let id = channel.publish(names::SEND, payload).await?;
            tracing::debug!(channel = %channel.channel_name(), %id, "seeded empty channel");
            Ok((MessageLog::new(), Reconciliation::Seeded(id)))
        }
        None => Ok((MessageLog::new(), Reconciliation::Empty)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimchat_core::{Claim, DeletePayload};

    fn event(serial: u64, name: &str, data: serde_json::Value, claim: &str) -> ChannelEvent {
        ChannelEvent {
            name: name.to_string(),
            id: MessageId::from_serial(serial),
            data,
            user_claim: Some(Claim::new(claim)),
        }
    }

    fn send(serial: u64, author: &str) -> ChannelEvent {
        event(
            serial,
            names::SEND,
            SendPayload::new(MessageDraft::new(author, "hi", 0)).to_value(),
            "user",
        )
    }

    #[test]
    fn test_replay_reverses_newest_first_history() {
        let chronological = vec![
            send(1, "alice"),
            send(2, "bob"),
            event(
                3,
                names::DELETE,
                DeletePayload::new("alice", MessageId::from_serial(1)).to_value(),
                "user",
            ),
        ];
        let mut newest_first = chronological.clone();
        newest_first.reverse();

        let log = replay(&newest_first);

        let authors: Vec<_> = log.iter().map(|m| m.author()).collect();
        assert_eq!(authors, vec!["alice", "bob"]);
        assert!(log.messages()[0].is_deleted());
    }

    #[test]
    fn test_replay_without_reversal_would_lose_delete() {
        // Delete folded before its target is a no-op; reversal matters.
        let newest_first = vec![
            event(
                2,
                names::DELETE,
                DeletePayload::new("alice", MessageId::from_serial(1)).to_value(),
                "user",
            ),
            send(1, "alice"),
        ];

        assert!(replay(&newest_first).messages()[0].is_deleted());

        let mut wrong_order = MessageLog::new();
        for e in &newest_first {
            reducer::ingest(&mut wrong_order, e);
        }
        assert!(!wrong_order.messages()[0].is_deleted());
    }
}
