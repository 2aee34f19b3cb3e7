//! The chat session: one client's view of one channel.
//!
//! A session binds a credential, subscribes, reconciles history and then hands
//! the log to a single reducer task. Readers observe snapshots through a
//! `watch` channel; outbound actions go through the role switch controller.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use claimchat_auth::{AuthError, CredentialProvider};
use claimchat_channel::{ChannelError, EventChannel, Subscription};
use claimchat_core::{
    names, random_author, ClientId, DeletePayload, Message, MessageDraft, MessageId, Role,
    SendPayload,
};

use crate::config::{SeedMessage, SessionConfig};
use crate::error::{Result, SessionError};
use crate::history::{self, Reconciliation};
use crate::log::MessageLog;
use crate::reducer;
use crate::role::{RoleState, RoleSwitchController};

/// A connected chat client.
pub struct ChatSession<C: EventChannel + ?Sized, P: CredentialProvider> {
    author: String,
    channel: Arc<C>,
    roles: RoleSwitchController<P>,
    log: watch::Receiver<MessageLog>,
    reconciliation: Reconciliation,
    reducer: JoinHandle<()>,
}

impl<C: EventChannel + ?Sized, P: CredentialProvider> ChatSession<C, P> {
    /// Connect to `channel` as `identity`.
    ///
    /// Subscribes before fetching history so nothing published in between is
    /// missed; events present in both are absorbed by the reducer.
    pub async fn start(
        channel: Arc<C>,
        provider: P,
        identity: ClientId,
        config: SessionConfig,
    ) -> Result<Self> {
        let author = config
            .author
            .unwrap_or_else(|| random_author(&mut rand::thread_rng()));
        let roles = RoleSwitchController::new(provider, identity, config.initial_role);

        roles.bind(channel.as_ref()).await?;
        let subscription = channel.subscribe().await?;

        let seed = config.seed.as_ref().map(SeedMessage::to_draft);
        let (log, reconciliation) = history::reconcile(channel.as_ref(), seed.as_ref()).await?;

        let (tx, rx) = watch::channel(log);
        let reducer = tokio::spawn(run_reducer(subscription, tx));

        tracing::info!(
            channel = %channel.channel_name(),
            identity = %roles.identity(),
            author = %author,
            role = %roles.role(),
            ?reconciliation,
            "session started"
        );

        Ok(Self {
            author,
            channel,
            roles,
            log: rx,
            reconciliation,
            reducer,
        })
    }

    /// Display author stamped on outgoing messages.
    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn identity(&self) -> &ClientId {
        self.roles.identity()
    }

    pub fn channel(&self) -> &Arc<C> {
        &self.channel
    }

    /// Local role mirror. Only used for UX; deletes are judged by claims.
    pub fn role(&self) -> Role {
        self.roles.role()
    }

    pub fn role_state(&self) -> RoleState {
        self.roles.state()
    }

    pub fn is_switching(&self) -> bool {
        self.roles.is_switching()
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    /// Snapshot of the current log.
    pub fn messages(&self) -> MessageLog {
        self.log.borrow().clone()
    }

    /// A receiver that sees every change to the log.
    pub fn watch(&self) -> watch::Receiver<MessageLog> {
        self.log.clone()
    }

    /// Wait until the log satisfies `predicate` and return that snapshot.
    pub async fn wait_for_log(
        &self,
        predicate: impl FnMut(&MessageLog) -> bool,
    ) -> Result<MessageLog> {
        let mut rx = self.log.clone();
        let log = rx
            .wait_for(predicate)
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(log.clone())
    }

    /// Publish a message. An empty draft is not sent and yields `None`.
    ///
    /// The log only changes when the event comes back from the channel.
    pub async fn send_message(&self, content: &str) -> Result<Option<MessageId>> {
        if content.is_empty() {
            return Ok(None);
        }
        let draft = MessageDraft::now(self.author.clone(), content);
        let id = self
            .publish(names::SEND, SendPayload::new(draft).to_value())
            .await?;
        tracing::debug!(%id, author = %self.author, "sent message");
        Ok(Some(id))
    }

    /// Publish a delete for `target`.
    ///
    /// Whether it takes effect is decided by every receiver from the claim the
    /// channel attaches; a denied delete is not an error here.
    pub async fn delete_message(&self, target: &MessageId) -> Result<MessageId> {
        let payload = DeletePayload::new(self.author.clone(), target.clone());
        let id = self.publish(names::DELETE, payload.to_value()).await?;
        tracing::debug!(%id, %target, "requested delete");
        Ok(id)
    }

    /// Publish under an outbound permit.
    ///
    /// An expired credential is renewed once, for the current role, and the
    /// publish retried.
    async fn publish(&self, name: &str, data: Value) -> Result<MessageId> {
        let _permit = self.roles.outbound().await?;

        match self.channel.publish(name, data.clone()).await {
            Err(ChannelError::Unauthorized(AuthError::Expired { .. })) => {
                tracing::info!(
                    identity = %self.roles.identity(),
                    role = %self.roles.role(),
                    "credential expired, renewing"
                );
                self.roles.bind(self.channel.as_ref()).await?;
                Ok(self.channel.publish(name, data).await?)
            }
            result => Ok(result?),
        }
    }

    /// Whether to offer a delete control for `message`.
    pub fn can_offer_delete(&self, message: &Message) -> bool {
        if message.is_deleted() {
            return false;
        }
        match self.roles.state() {
            RoleState::Switching { .. } => false,
            RoleState::Stable(role) => role.is_moderator() || message.author() == self.author,
        }
    }

    /// Toggle between participant and moderator.
    pub async fn switch_mode(&self) -> Result<Role> {
        self.roles.switch_mode(self.channel.as_ref()).await
    }
}

impl<C: EventChannel + ?Sized, P: CredentialProvider> Drop for ChatSession<C, P> {
    fn drop(&mut self) {
        self.reducer.abort();
    }
}

/// Fold live events into the log until the subscription ends.
async fn run_reducer(mut subscription: Subscription, log: watch::Sender<MessageLog>) {
    while let Some(event) = subscription.recv().await {
        log.send_if_modified(|log| {
            reducer::ingest(log, &event).is_some_and(|applied| applied.changed())
        });
    }
    tracing::debug!("subscription closed, reducer stopping");
}
