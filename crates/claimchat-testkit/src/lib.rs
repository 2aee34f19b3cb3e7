//! # Claimchat Testkit
//!
//! Testing utilities for claimchat.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: an in-memory hub with its issuer, sessions wired to it, and
//!   a credential provider that can be made to fail
//! - **Generators**: Proptest strategies for chat event sequences
//!
//! ## Test Fixtures
//!
//! ```rust,no_run
//! use claimchat_core::Role;
//! use claimchat_testkit::fixtures::TestHub;
//!
//! async fn example() -> claimchat::Result<()> {
//!     let hub = TestHub::new("general");
//!     let alice = hub.session("alice", Role::Participant).await?;
//!     alice.send_message("hi").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use claimchat::fold;
//! use claimchat_testkit::generators::chat_events;
//!
//! proptest! {
//!     #[test]
//!     fn fold_is_deterministic(events in chat_events(32)) {
//!         prop_assert_eq!(fold(&events), fold(&events));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{wait_for_message, FailingProvider, TestHub, TestSession};
pub use generators::{chat_events, sends, to_channel_event, to_channel_events};
