//! The credential provider seam.
//!
//! Clients call a provider whenever they need a credential: once at session
//! start and again on every role switch. Implementations may call out to a
//! remote token endpoint; [`LocalCredentialProvider`] signs in-process.

use std::sync::Arc;

use async_trait::async_trait;

use claimchat_core::{ChannelName, ClientId, Role};

use crate::credential::Credential;
use crate::error::Result;
use crate::issuer::CredentialIssuer;

/// Source of channel-access credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Mint a credential for `identity` on `channel` carrying `role`.
    async fn issue_credential(
        &self,
        identity: &ClientId,
        channel: &ChannelName,
        role: Role,
    ) -> Result<Credential>;
}

#[async_trait]
impl<P: CredentialProvider + ?Sized> CredentialProvider for Arc<P> {
    async fn issue_credential(
        &self,
        identity: &ClientId,
        channel: &ChannelName,
        role: Role,
    ) -> Result<Credential> {
        (**self).issue_credential(identity, channel, role).await
    }
}

/// Provider backed by an in-process issuer.
#[derive(Debug, Clone)]
pub struct LocalCredentialProvider {
    issuer: Arc<CredentialIssuer>,
}

impl LocalCredentialProvider {
    pub fn new(issuer: Arc<CredentialIssuer>) -> Self {
        Self { issuer }
    }

    pub fn issuer(&self) -> &CredentialIssuer {
        &self.issuer
    }
}

#[async_trait]
impl CredentialProvider for LocalCredentialProvider {
    async fn issue_credential(
        &self,
        identity: &ClientId,
        channel: &ChannelName,
        role: Role,
    ) -> Result<Credential> {
        self.issuer.issue(identity, channel, role)
    }
}
