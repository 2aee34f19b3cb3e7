//! In-memory event channel.
//!
//! A [`MemoryHub`] is one channel: a single sequencer, a bounded history ring
//! and a set of subscribers. [`MemoryChannel`] handles connect to it, each with
//! its own bound credential. The hub verifies that credential on every publish
//! and attaches the role claim to the event it fans out.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

use claimchat_auth::{Credential, CredentialVerifier};
use claimchat_core::{now_millis, ChannelEvent, ChannelName, Claim, MessageId};

use crate::channel::{EventChannel, Subscription};
use crate::error::{ChannelError, Result};

/// Configuration for an in-memory hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of events kept for history replay.
    pub history_limit: usize,
    /// Per-subscriber queue depth, at least 1. A subscriber whose queue is
    /// full when an event is sequenced is disconnected.
    pub subscriber_buffer: usize,
    /// Whether delivered events carry the publisher's role claim.
    pub inject_claims: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            history_limit: 100,
            subscriber_buffer: 1000,
            inject_claims: true,
        }
    }
}

impl HubConfig {
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_subscriber_buffer(mut self, buffer: usize) -> Self {
        self.subscriber_buffer = buffer.max(1);
        self
    }

    pub fn with_claims(mut self, inject: bool) -> Self {
        self.inject_claims = inject;
        self
    }
}

/// One in-memory channel.
pub struct MemoryHub {
    channel: ChannelName,
    verifier: CredentialVerifier,
    config: HubConfig,
    state: RwLock<HubState>,
    offline: AtomicBool,
}

struct HubState {
    /// Serial of the last event sequenced.
    last_serial: u64,
    /// Oldest first; trimmed to `history_limit`.
    history: VecDeque<ChannelEvent>,
    subscribers: Vec<mpsc::Sender<ChannelEvent>>,
}

impl MemoryHub {
    /// Create a hub for `channel`, trusting credentials `verifier` accepts.
    pub fn new(channel: ChannelName, verifier: CredentialVerifier, config: HubConfig) -> Arc<Self> {
        Arc::new(Self {
            channel,
            verifier,
            config,
            state: RwLock::new(HubState {
                last_serial: 0,
                history: VecDeque::new(),
                subscribers: Vec::new(),
            }),
            offline: AtomicBool::new(false),
        })
    }

    /// Open a new handle with no credential bound.
    pub fn connect(self: &Arc<Self>) -> MemoryChannel {
        MemoryChannel {
            hub: Arc::clone(self),
            credential: RwLock::new(None),
        }
    }

    pub fn channel_name(&self) -> &ChannelName {
        &self.channel
    }

    /// Simulate a network outage: publishes and history fail while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of live subscriptions.
    pub async fn subscriber_count(&self) -> usize {
        let state = self.state.read().await;
        state.subscribers.iter().filter(|s| !s.is_closed()).count()
    }

    /// Sequence an event without a publishing credential.
    ///
    /// Stands in for events published by other SDKs or by the service itself,
    /// e.g. kinds this client does not understand or events with no claim.
    pub async fn deliver_raw(&self, name: &str, data: Value, claim: Option<Claim>) -> MessageId {
        self.sequence(name, data, claim).await
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ChannelError::TransportError("hub offline".into()));
        }
        Ok(())
    }

    /// Verify `credential` for this channel and return the claim to attach.
    fn claim_for(&self, credential: &Credential) -> Result<Option<Claim>> {
        let claims = self.verifier.verify(credential, &self.channel, now_millis())?;
        if self.config.inject_claims {
            Ok(Some(Claim::from(claims.role)))
        } else {
            Ok(None)
        }
    }

    /// Assign the next id, record in history and fan out.
    async fn sequence(&self, name: &str, data: Value, claim: Option<Claim>) -> MessageId {
        let mut state = self.state.write().await;

        state.last_serial += 1;
        let event = ChannelEvent {
            name: name.to_string(),
            id: MessageId::from_serial(state.last_serial),
            data,
            user_claim: claim,
        };

        state.history.push_back(event.clone());
        while state.history.len() > self.config.history_limit {
            state.history.pop_front();
        }

        // Fan-out must not block; a full queue disconnects its subscriber.
        state.subscribers.retain(|subscriber| match subscriber.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(channel = %self.channel, "dropping lagging subscriber");
                false
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(channel = %self.channel, "dropping closed subscriber");
                false
            }
        });

        event.id
    }
}

/// A handle onto a [`MemoryHub`].
pub struct MemoryChannel {
    hub: Arc<MemoryHub>,
    credential: RwLock<Option<Credential>>,
}

impl MemoryChannel {
    pub fn hub(&self) -> &Arc<MemoryHub> {
        &self.hub
    }
}

#[async_trait]
impl EventChannel for MemoryChannel {
    fn channel_name(&self) -> &ChannelName {
        &self.hub.channel
    }

    async fn authorize(&self, credential: Credential) -> Result<()> {
        // Reject bad credentials at bind time, not on the first publish.
        self.hub.claim_for(&credential)?;

        tracing::debug!(
            channel = %self.hub.channel,
            role = %credential.role(),
            fingerprint = %credential.fingerprint(),
            "credential bound"
        );
        *self.credential.write().await = Some(credential);
        Ok(())
    }

    async fn publish(&self, name: &str, data: Value) -> Result<MessageId> {
        self.hub.check_online()?;

        let claim = {
            let guard = self.credential.read().await;
            let credential = guard.as_ref().ok_or(ChannelError::Unauthenticated)?;
            self.hub.claim_for(credential).map_err(|e| {
                tracing::warn!(
                    channel = %self.hub.channel,
                    fingerprint = %credential.fingerprint(),
                    error = %e,
                    "publish rejected"
                );
                e
            })?
        };

        Ok(self.hub.sequence(name, data, claim).await)
    }

    async fn subscribe(&self) -> Result<Subscription> {
        let (tx, rx) = mpsc::channel(self.hub.config.subscriber_buffer.max(1));
        self.hub.state.write().await.subscribers.push(tx);
        Ok(Subscription::new(rx))
    }

    async fn history(&self) -> Result<Vec<ChannelEvent>> {
        self.hub.check_online()?;
        if self.credential.read().await.is_none() {
            return Err(ChannelError::Unauthenticated);
        }

        let state = self.hub.state.read().await;
        Ok(state.history.iter().rev().cloned().collect())
    }
}
