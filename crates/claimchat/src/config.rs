//! Session configuration.

use claimchat_core::{MessageDraft, Role};

/// Author of the message used to bootstrap an empty channel.
pub const SEED_AUTHOR: &str = "Joe Bloggs";

/// Content of the message used to bootstrap an empty channel.
pub const SEED_CONTENT: &str = "You won't believe this get rich quick scheme!";

/// Message published when a session finds the channel empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedMessage {
    pub author: String,
    pub content: String,
}

impl Default for SeedMessage {
    fn default() -> Self {
        Self {
            author: SEED_AUTHOR.to_string(),
            content: SEED_CONTENT.to_string(),
        }
    }
}

impl SeedMessage {
    /// Draft stamped with the current time.
    pub fn to_draft(&self) -> MessageDraft {
        MessageDraft::now(self.author.clone(), self.content.clone())
    }
}

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Display author. `None` picks two random words.
    pub author: Option<String>,
    /// Role requested for the first credential.
    pub initial_role: Role,
    /// Seed for empty channels. `None` leaves an empty channel empty.
    pub seed: Option<SeedMessage>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            author: None,
            initial_role: Role::Participant,
            seed: Some(SeedMessage::default()),
        }
    }
}

impl SessionConfig {
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_initial_role(mut self, role: Role) -> Self {
        self.initial_role = role;
        self
    }

    pub fn with_seed(mut self, seed: Option<SeedMessage>) -> Self {
        self.seed = seed;
        self
    }
}
