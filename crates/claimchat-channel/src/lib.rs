//! # Claimchat Channel
//!
//! The pub/sub channel a chat session talks to.
//!
//! ## Overview
//!
//! [`EventChannel`] is the seam between the chat core and whatever transport
//! carries events. A channel handle is bound to one channel name and one
//! credential at a time. Every event it delivers carries the claim the
//! transport extracted from the publisher's credential.
//!
//! [`MemoryHub`] is an in-process implementation: a single sequencer per
//! channel with a bounded history buffer. It verifies the publisher's
//! credential on every publish and injects the role claim itself.
//!
//! ## Guarantees
//!
//! - **Total order**: one sequencer per channel; ids increase with arrival
//! - **Self-delivery**: publishers receive their own events
//! - **Bounded history**: newest-first, capped at [`HubConfig::history_limit`]
//! - **Unforgeable claims**: the claim comes from the verified credential
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use claimchat_auth::{CredentialIssuer, IssuerConfig};
//! use claimchat_channel::{EventChannel, HubConfig, MemoryHub};
//! use claimchat_core::{ChannelName, ClientId, Keypair, Role};
//!
//! async fn example() {
//!     let issuer = CredentialIssuer::new(Keypair::generate(), IssuerConfig::default());
//!     let name = ChannelName::new("user-claims");
//!     let hub = MemoryHub::new(name.clone(), issuer.verifier(), HubConfig::default());
//!
//!     let channel = hub.connect();
//!     let credential = issuer.issue(&ClientId::new("c1"), &name, Role::Participant).unwrap();
//!     channel.authorize(credential).await.unwrap();
//!
//!     let mut subscription = channel.subscribe().await.unwrap();
//!     // channel.publish("send", payload).await?;
//!     // let event = subscription.recv().await;
//! }
//! ```

pub mod channel;
pub mod error;
pub mod memory;

pub use channel::{EventChannel, Subscription};
pub use error::{ChannelError, Result};
pub use memory::{HubConfig, MemoryChannel, MemoryHub};
