//! # Claimchat Core
//!
//! Pure primitives for claimchat: chat messages, channel events, roles and
//! the claims the transport attaches to every event.
//!
//! This crate contains no I/O and no networking. Everything here is plain data
//! plus the decoding rules that turn a delivered [`ChannelEvent`] into a typed
//! [`ChatEvent`].
//!
//! ## Key Types
//!
//! - [`Message`] - One chat entry in the message log
//! - [`MessageId`] - Channel-assigned identifier (the "timeserial")
//! - [`ChannelEvent`] - An event as delivered by the transport, claim included
//! - [`ChatEvent`] - The tagged event kinds the reducer understands
//! - [`Role`] - The local role mirror (participant or moderator)
//! - [`Claim`] - The verified claim the transport attached to an event
//!
//! ## Roles versus claims
//!
//! A [`Role`] is what the local client believes it is. A [`Claim`] is what the
//! transport verified from the publisher's credential. Authorization only ever
//! looks at the claim.

pub mod claim;
pub mod crypto;
pub mod error;
pub mod event;
pub mod identity;
pub mod message;
pub mod types;

pub use claim::{Claim, Role, MODERATOR_CLAIM, PARTICIPANT_CLAIM};
pub use crypto::{Fingerprint, Keypair, PublicKey, Signature};
pub use error::{CoreError, Result};
pub use event::{
    names, ChannelEvent, ChatEvent, DeleteExtras, DeletePayload, DeleteRef, SendPayload,
    DELETE_REF_TYPE,
};
pub use identity::random_author;
pub use message::{now_millis, Message, MessageDraft, DELETED_PLACEHOLDER};
pub use types::{ChannelName, ClientId, MessageId};
