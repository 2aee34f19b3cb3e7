//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use claimchat::{ChatSession, MessageLog, SessionConfig};
use claimchat_auth::{
    AuthError, Credential, CredentialIssuer, CredentialProvider, IssuerConfig,
    LocalCredentialProvider,
};
use claimchat_channel::{HubConfig, MemoryChannel, MemoryHub};
use claimchat_core::{ChannelName, ClientId, Keypair, MessageId, Role};

/// A session on a [`TestHub`] with a working provider.
pub type TestSession = ChatSession<MemoryChannel, LocalCredentialProvider>;

/// An in-memory hub and the issuer it trusts.
pub struct TestHub {
    pub issuer: Arc<CredentialIssuer>,
    pub hub: Arc<MemoryHub>,
}

impl TestHub {
    /// Hub with default config and a random issuer key.
    pub fn new(channel: &str) -> Self {
        Self::with_config(channel, HubConfig::default())
    }

    pub fn with_config(channel: &str, config: HubConfig) -> Self {
        Self::build(Keypair::generate(), channel, config, IssuerConfig::default())
    }

    /// Deterministic issuer key.
    pub fn with_seed(seed: [u8; 32], channel: &str) -> Self {
        Self::build(
            Keypair::from_seed(&seed),
            channel,
            HubConfig::default(),
            IssuerConfig::default(),
        )
    }

    /// Issuer whose credentials expire after `ttl`.
    pub fn with_ttl(channel: &str, ttl: Duration) -> Self {
        Self::build(
            Keypair::generate(),
            channel,
            HubConfig::default(),
            IssuerConfig::default().with_ttl(Some(ttl)),
        )
    }

    fn build(keypair: Keypair, channel: &str, config: HubConfig, issuer: IssuerConfig) -> Self {
        let issuer = Arc::new(CredentialIssuer::new(keypair, issuer));
        let hub = MemoryHub::new(ChannelName::new(channel), issuer.verifier(), config);
        Self { issuer, hub }
    }

    pub fn channel_name(&self) -> &ChannelName {
        self.hub.channel_name()
    }

    pub fn provider(&self) -> LocalCredentialProvider {
        LocalCredentialProvider::new(Arc::clone(&self.issuer))
    }

    pub fn failing_provider(&self) -> Arc<FailingProvider> {
        Arc::new(FailingProvider::new(self.provider()))
    }

    /// Session whose client id and author are both `name`. Seeds an empty
    /// channel like a real client would.
    pub async fn session(&self, name: &str, role: Role) -> claimchat::Result<TestSession> {
        let config = SessionConfig::default()
            .with_author(name)
            .with_initial_role(role);
        self.session_with(name, self.provider(), config).await
    }

    /// Same as [`session`](Self::session) but never seeds.
    pub async fn unseeded_session(&self, name: &str, role: Role) -> claimchat::Result<TestSession> {
        let config = SessionConfig::default()
            .with_author(name)
            .with_initial_role(role)
            .with_seed(None);
        self.session_with(name, self.provider(), config).await
    }

    pub async fn session_with<P: CredentialProvider>(
        &self,
        name: &str,
        provider: P,
        config: SessionConfig,
    ) -> claimchat::Result<ChatSession<MemoryChannel, P>> {
        ChatSession::start(
            Arc::new(self.hub.connect()),
            provider,
            ClientId::new(name),
            config,
        )
        .await
    }
}

/// Provider that can be switched into failing mode.
pub struct FailingProvider {
    inner: LocalCredentialProvider,
    failing: AtomicBool,
}

impl FailingProvider {
    pub fn new(inner: LocalCredentialProvider) -> Self {
        Self {
            inner,
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_failing(&self) -> bool {
        self.failing.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for FailingProvider {
    async fn issue_credential(
        &self,
        identity: &ClientId,
        channel: &ChannelName,
        role: Role,
    ) -> claimchat_auth::Result<Credential> {
        if self.is_failing() {
            return Err(AuthError::IssuanceFailed(format!(
                "token endpoint unavailable for {identity}"
            )));
        }
        self.inner.issue_credential(identity, channel, role).await
    }
}

/// Wait until `session` has applied the event with `id` and return that log.
pub async fn wait_for_message<P: CredentialProvider>(
    session: &ChatSession<MemoryChannel, P>,
    id: &MessageId,
) -> claimchat::Result<MessageLog> {
    session.wait_for_log(|log| log.contains(id)).await
}
