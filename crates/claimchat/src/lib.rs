//! # Claimchat
//!
//! Group chat where deletes are moderated by claims the channel attaches to
//! each event.
//!
//! ## Overview
//!
//! - **Message log**: ordered messages, soft-deleted but never removed
//! - **Reducer**: the only thing that changes the log, one event at a time
//! - **Authorization gate**: moderators delete anything, everyone else their own
//! - **History reconciliation**: late joiners replay what they missed
//! - **Role switching**: swap credentials between participant and moderator
//!
//! Every client runs the same reducer over the same ordered events, so every
//! client ends up with the same log. The claim used to authorize a delete is
//! the one the channel verified from the sender's credential, not anything in
//! the payload.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use claimchat::auth::{CredentialIssuer, IssuerConfig, LocalCredentialProvider};
//! use claimchat::channel::{HubConfig, MemoryHub};
//! use claimchat::core::{ChannelName, ClientId, Keypair};
//! use claimchat::{ChatSession, SessionConfig};
//!
//! async fn example() -> claimchat::Result<()> {
//!     let issuer = Arc::new(CredentialIssuer::new(Keypair::generate(), IssuerConfig::default()));
//!     let channel = ChannelName::new("general");
//!     let hub = MemoryHub::new(channel, issuer.verifier(), HubConfig::default());
//!
//!     let session = ChatSession::start(
//!         Arc::new(hub.connect()),
//!         LocalCredentialProvider::new(issuer),
//!         ClientId::new("alice"),
//!         SessionConfig::default().with_author("alice"),
//!     )
//!     .await?;
//!
//!     session.send_message("hello").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `claimchat::core` - Messages, events, claims and keys
//! - `claimchat::auth` - Credentials and the authorization gate
//! - `claimchat::channel` - Channel abstraction and the in-memory hub

pub mod config;
pub mod error;
pub mod history;
pub mod log;
pub mod reducer;
pub mod role;
pub mod session;

// Re-export component crates
pub use claimchat_auth as auth;
pub use claimchat_channel as channel;
pub use claimchat_core as core;

pub use config::{SeedMessage, SessionConfig, SEED_AUTHOR, SEED_CONTENT};
pub use error::{Result, SessionError, SwitchFailure};
pub use history::{reconcile, replay, Reconciliation};
pub use log::MessageLog;
pub use reducer::{apply, fold, ingest, Applied};
pub use role::{OutboundPermit, RoleState, RoleSwitch, RoleSwitchController};
pub use session::ChatSession;

pub use claimchat_auth::{can_delete, DeleteDecision};
pub use claimchat_core::{ChatEvent, Claim, Message, MessageId, Role};
