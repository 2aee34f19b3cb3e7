//! Channel events and the typed chat events decoded from them.
//!
//! The transport delivers [`ChannelEvent`]s: a name, a channel-assigned id, the
//! payload exactly as the publisher sent it, and the claim the transport
//! extracted from the publisher's credential. [`ChatEvent::decode`] turns one of
//! those into the closed set of kinds the message log understands.
//!
//! The claim is read from [`ChannelEvent::user_claim`] only. Anything the
//! publisher put inside `data` that looks like a claim is ignored.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::claim::Claim;
use crate::error::{CoreError, Result};
use crate::message::MessageDraft;
use crate::types::MessageId;

/// Event names as published on the channel.
pub mod names {
    pub const SEND: &str = "send";
    pub const DELETE: &str = "delete";
    pub const CLEAR: &str = "clear";
}

/// Reference type carried by a delete event.
pub const DELETE_REF_TYPE: &str = "delete-reference";

/// An event as delivered by the channel to a subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEvent {
    /// Event kind as published.
    pub name: String,

    /// Channel-assigned id.
    pub id: MessageId,

    /// Payload as published.
    pub data: Value,

    /// Claim taken from the publisher's credential by the transport.
    ///
    /// `None` when the transport delivers without claims.
    pub user_claim: Option<Claim>,
}

/// Payload of a `send` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendPayload {
    pub message: MessageDraft,
}

impl SendPayload {
    pub fn new(message: MessageDraft) -> Self {
        Self { message }
    }

    /// Wire form: `{ "message": { "author", "content", "timestamp" } }`.
    pub fn to_value(&self) -> Value {
        json!({
            "message": {
                "author": self.message.author,
                "content": self.message.content,
                "timestamp": self.message.timestamp,
            }
        })
    }
}

/// Payload of a `delete` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePayload {
    /// Author name of the client requesting the delete.
    pub user: String,

    pub extras: DeleteExtras,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteExtras {
    #[serde(rename = "ref")]
    pub reference: DeleteRef,
}

/// Points a delete at the message it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRef {
    #[serde(rename = "type")]
    pub kind: String,

    /// Channel-assigned id of the target message.
    pub timeserial: MessageId,
}

impl DeletePayload {
    pub fn new(user: impl Into<String>, target: MessageId) -> Self {
        Self {
            user: user.into(),
            extras: DeleteExtras {
                reference: DeleteRef {
                    kind: DELETE_REF_TYPE.to_string(),
                    timeserial: target,
                },
            },
        }
    }

    /// Wire form: `{ "user", "extras": { "ref": { "type", "timeserial" } } }`.
    pub fn to_value(&self) -> Value {
        json!({
            "user": self.user,
            "extras": {
                "ref": {
                    "type": self.extras.reference.kind,
                    "timeserial": self.extras.reference.timeserial.as_str(),
                }
            }
        })
    }
}

/// The event kinds the message log folds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Append a message under its channel-assigned id.
    Send { id: MessageId, message: MessageDraft },

    /// Soft-delete `target` on behalf of `user`, authorized by `claim`.
    Delete {
        user: String,
        target: MessageId,
        claim: Option<Claim>,
    },

    /// Drop every message. Local reset only.
    Clear,
}

impl ChatEvent {
    /// Decode a delivered channel event.
    ///
    /// Unknown names and payloads that do not match their kind are errors;
    /// the fold treats both as "leave the log alone".
    pub fn decode(event: &ChannelEvent) -> Result<Self> {
        match event.name.as_str() {
            names::SEND => {
                let payload = SendPayload::deserialize(&event.data)
                    .map_err(|e| malformed(&event.name, e))?;
                Ok(ChatEvent::Send {
                    id: event.id.clone(),
                    message: payload.message,
                })
            }
            names::DELETE => {
                let payload = DeletePayload::deserialize(&event.data)
                    .map_err(|e| malformed(&event.name, e))?;
                let reference = payload.extras.reference;
                if reference.kind != DELETE_REF_TYPE {
                    return Err(malformed(
                        &event.name,
                        format!("unsupported reference type {:?}", reference.kind),
                    ));
                }
                Ok(ChatEvent::Delete {
                    user: payload.user,
                    target: reference.timeserial,
                    claim: event.user_claim.clone(),
                })
            }
            names::CLEAR => Ok(ChatEvent::Clear),
            other => Err(CoreError::UnknownEvent(other.to_string())),
        }
    }

    /// The wire name of this event kind.
    pub fn name(&self) -> &'static str {
        match self {
            ChatEvent::Send { .. } => names::SEND,
            ChatEvent::Delete { .. } => names::DELETE,
            ChatEvent::Clear => names::CLEAR,
        }
    }
}

impl TryFrom<&ChannelEvent> for ChatEvent {
    type Error = CoreError;

    fn try_from(event: &ChannelEvent) -> Result<Self> {
        ChatEvent::decode(event)
    }
}

fn malformed(name: &str, reason: impl ToString) -> CoreError {
    CoreError::MalformedEvent {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delivered(name: &str, id: &str, data: Value, claim: Option<&str>) -> ChannelEvent {
        ChannelEvent {
            name: name.to_string(),
            id: MessageId::new(id),
            data,
            user_claim: claim.map(Claim::new),
        }
    }

    #[test]
    fn test_decode_send_takes_channel_id() {
        let data = SendPayload::new(MessageDraft::new("amberfox", "hi", 1)).to_value();
        let event = delivered(names::SEND, "42", data, Some("user"));

        match ChatEvent::decode(&event).unwrap() {
            ChatEvent::Send { id, message } => {
                assert_eq!(id.as_str(), "42");
                assert_eq!(message.author, "amberfox");
                assert_eq!(message.content, "hi");
            }
            other => panic!("expected Send, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_send_with_iso_or_missing_timestamp() {
        let iso = json!({
            "message": { "author": "a", "content": "hi", "timestamp": "2024-01-01T00:00:00.000Z" }
        });
        match ChatEvent::decode(&delivered(names::SEND, "1", iso, None)).unwrap() {
            ChatEvent::Send { message, .. } => assert_eq!(message.timestamp, 1_704_067_200_000),
            other => panic!("expected Send, got {:?}", other),
        }

        let missing = json!({ "message": { "author": "a", "content": "hi" } });
        match ChatEvent::decode(&delivered(names::SEND, "2", missing, None)).unwrap() {
            ChatEvent::Send { message, .. } => {
                assert_eq!(message.timestamp, 0);
                assert_eq!(message.content, "hi");
            }
            other => panic!("expected Send, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_delete_wire_shape() {
        let data = json!({
            "user": "amberfox",
            "extras": { "ref": { "type": "delete-reference", "timeserial": "7" } }
        });
        let event = delivered(names::DELETE, "8", data, Some("moderator"));

        assert_eq!(
            ChatEvent::decode(&event).unwrap(),
            ChatEvent::Delete {
                user: "amberfox".into(),
                target: MessageId::new("7"),
                claim: Some(Claim::new("moderator")),
            }
        );
    }

    #[test]
    fn test_delete_payload_builder_matches_wire_shape() {
        let value = DeletePayload::new("amberfox", MessageId::new("7")).to_value();
        assert_eq!(value["extras"]["ref"]["type"], "delete-reference");
        assert_eq!(value["extras"]["ref"]["timeserial"], "7");
        assert_eq!(value["user"], "amberfox");
    }

    #[test]
    fn test_claim_inside_payload_is_ignored() {
        let data = json!({
            "user": "mallory",
            "extras": {
                "userClaim": "moderator",
                "ref": { "type": "delete-reference", "timeserial": "1" }
            }
        });
        let event = delivered(names::DELETE, "2", data, Some("user"));

        match ChatEvent::decode(&event).unwrap() {
            ChatEvent::Delete { claim, .. } => assert_eq!(claim, Some(Claim::new("user"))),
            other => panic!("expected Delete, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        let event = delivered("react", "1", json!({}), None);
        assert!(matches!(
            ChatEvent::decode(&event),
            Err(CoreError::UnknownEvent(name)) if name == "react"
        ));
    }

    #[test]
    fn test_malformed_payloads_are_rejected() {
        let send = delivered(names::SEND, "1", json!({ "text": "hi" }), None);
        assert!(matches!(
            ChatEvent::decode(&send),
            Err(CoreError::MalformedEvent { .. })
        ));

        let wrong_ref = delivered(
            names::DELETE,
            "2",
            json!({ "user": "a", "extras": { "ref": { "type": "reaction", "timeserial": "1" } } }),
            None,
        );
        assert!(matches!(
            ChatEvent::decode(&wrong_ref),
            Err(CoreError::MalformedEvent { .. })
        ));
    }

    #[test]
    fn test_clear_ignores_payload() {
        let event = delivered(names::CLEAR, "1", Value::Null, None);
        assert_eq!(ChatEvent::decode(&event).unwrap(), ChatEvent::Clear);
    }
}
