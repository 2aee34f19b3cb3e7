//! Credential issuance and verification.
//!
//! The issuer holds the signing key. The verifier holds only the public key
//! and is what a transport embeds to check credentials on publish.

use std::time::Duration;

use claimchat_core::{now_millis, ChannelName, ClientId, Keypair, PublicKey, Role};

use crate::credential::{Credential, CredentialClaims};
use crate::error::{AuthError, Result};

/// Configuration for credential issuance.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// How long issued credentials stay valid. `None` never expires.
    pub ttl: Option<Duration>,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            ttl: Some(Duration::from_secs(60 * 60)),
        }
    }
}

impl IssuerConfig {
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Mints signed credentials.
#[derive(Debug)]
pub struct CredentialIssuer {
    keypair: Keypair,
    config: IssuerConfig,
}

impl CredentialIssuer {
    pub fn new(keypair: Keypair, config: IssuerConfig) -> Self {
        Self { keypair, config }
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// A verifier for credentials from this issuer.
    pub fn verifier(&self) -> CredentialVerifier {
        CredentialVerifier::new(self.public_key())
    }

    /// Issue a credential stamped with the current time.
    pub fn issue(&self, client_id: &ClientId, channel: &ChannelName, role: Role) -> Result<Credential> {
        self.issue_at(client_id, channel, role, now_millis())
    }

    /// Issue a credential as of `now` (Unix milliseconds).
    pub fn issue_at(
        &self,
        client_id: &ClientId,
        channel: &ChannelName,
        role: Role,
        now: i64,
    ) -> Result<Credential> {
        let expires_at = self
            .config
            .ttl
            .map(|ttl| now.saturating_add(i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)));

        let claims = CredentialClaims {
            client_id: client_id.clone(),
            channel: channel.clone(),
            role,
            issued_at: now,
            expires_at,
        };

        let bytes = claims.to_bytes()?;
        let signature = self.keypair.sign(&bytes);
        let credential = Credential::from_parts(claims, bytes, signature);

        tracing::debug!(
            client_id = %client_id,
            channel = %channel,
            role = %role,
            fingerprint = %credential.fingerprint(),
            "issued credential"
        );

        Ok(credential)
    }
}

/// Checks credentials against an issuer's public key.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    public_key: PublicKey,
}

impl CredentialVerifier {
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }

    /// Verify a credential for use on `channel` at time `now`.
    ///
    /// Checks, in order: signature, channel scope, expiry.
    pub fn verify<'a>(
        &self,
        credential: &'a Credential,
        channel: &ChannelName,
        now: i64,
    ) -> Result<&'a CredentialClaims> {
        self.public_key
            .verify(credential.claims_bytes(), credential.signature())
            .map_err(|_| AuthError::SignatureInvalid)?;

        let claims = credential.claims();

        if &claims.channel != channel {
            return Err(AuthError::WrongChannel {
                expected: channel.to_string(),
                got: claims.channel.to_string(),
            });
        }

        if !claims.is_valid_at(now) {
            return Err(AuthError::Expired {
                expires_at: claims.expires_at.unwrap_or_default(),
                now,
            });
        }

        Ok(claims)
    }
}
