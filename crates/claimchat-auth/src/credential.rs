//! Signed channel-access credentials.
//!
//! The token form is `hex(cbor(claims)) "." hex(signature)`. The signature
//! covers the exact CBOR bytes carried in the token, so verification never
//! depends on re-encoding.

use std::fmt;

use serde::{Deserialize, Serialize};

use claimchat_core::{ChannelName, ClientId, Fingerprint, Role, Signature};

use crate::error::{AuthError, Result};

/// The claim set a credential carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialClaims {
    /// Identity the credential was issued to.
    pub client_id: ClientId,

    /// Channel the credential opens.
    pub channel: ChannelName,

    /// Role claim attached to everything published with this credential.
    pub role: Role,

    /// Issue time (Unix milliseconds).
    pub issued_at: i64,

    /// Expiry (Unix milliseconds). `None` never expires.
    pub expires_at: Option<i64>,
}

impl CredentialClaims {
    /// Whether the claims are still within their validity window.
    pub fn is_valid_at(&self, now: i64) -> bool {
        match self.expires_at {
            Some(expires) => now <= expires,
            None => true,
        }
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| AuthError::EncodingError(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| AuthError::EncodingError(e.to_string()))
    }
}

/// A signed credential.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    claims: CredentialClaims,
    claims_bytes: Vec<u8>,
    signature: Signature,
}

impl Credential {
    /// Assemble a credential from signed parts.
    ///
    /// `claims_bytes` must be the bytes `signature` was computed over.
    pub(crate) fn from_parts(
        claims: CredentialClaims,
        claims_bytes: Vec<u8>,
        signature: Signature,
    ) -> Self {
        Self {
            claims,
            claims_bytes,
            signature,
        }
    }

    /// Parse a token produced by [`Credential::token`].
    ///
    /// Only checks the structure. Use a verifier to check the signature.
    pub fn parse(token: &str) -> Result<Self> {
        let (claims_hex, sig_hex) = token
            .split_once('.')
            .ok_or_else(|| AuthError::InvalidToken("missing separator".into()))?;

        let claims_bytes =
            hex::decode(claims_hex).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let signature = Signature::from_hex(sig_hex)?;
        let claims = CredentialClaims::from_bytes(&claims_bytes)?;

        Ok(Self {
            claims,
            claims_bytes,
            signature,
        })
    }

    /// Render as a bearer token.
    pub fn token(&self) -> String {
        format!("{}.{}", hex::encode(&self.claims_bytes), self.signature.to_hex())
    }

    pub fn claims(&self) -> &CredentialClaims {
        &self.claims
    }

    pub fn role(&self) -> Role {
        self.claims.role
    }

    pub(crate) fn claims_bytes(&self) -> &[u8] {
        &self.claims_bytes
    }

    pub(crate) fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Stable fingerprint safe to log.
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(self.token().as_bytes())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.claims.client_id)
            .field("channel", &self.claims.channel)
            .field("role", &self.claims.role)
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}
