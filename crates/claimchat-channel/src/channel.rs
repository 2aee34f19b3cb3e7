//! Event channel abstraction.
//!
//! Implementations may sit on WebSockets, a hosted pub/sub service, or the
//! in-memory hub in this crate.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

use claimchat_auth::Credential;
use claimchat_core::{ChannelEvent, ChannelName, MessageId};

use crate::error::Result;

/// A handle onto one named channel.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait EventChannel: Send + Sync {
    /// The channel this handle is bound to.
    fn channel_name(&self) -> &ChannelName;

    /// Bind (or rebind) the credential used for publishing.
    ///
    /// The new credential applies to every publish after this returns.
    async fn authorize(&self, credential: Credential) -> Result<()>;

    /// Publish an event. Returns the id the channel assigned to it.
    ///
    /// Failures are returned as-is; nothing is retried.
    async fn publish(&self, name: &str, data: Value) -> Result<MessageId>;

    /// Subscribe to every event published from now on, own events included.
    async fn subscribe(&self) -> Result<Subscription>;

    /// Bounded history of past events, newest first.
    async fn history(&self) -> Result<Vec<ChannelEvent>>;
}

/// Stream of delivered events, in channel order.
#[derive(Debug)]
pub struct Subscription {
    receiver: mpsc::Receiver<ChannelEvent>,
}

impl Subscription {
    pub fn new(receiver: mpsc::Receiver<ChannelEvent>) -> Self {
        Self { receiver }
    }

    /// Wait for the next event. `None` once the channel is gone.
    pub async fn recv(&mut self) -> Option<ChannelEvent> {
        self.receiver.recv().await
    }
}
