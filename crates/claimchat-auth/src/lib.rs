//! # Claimchat Auth
//!
//! Channel-access credentials and the delete authorization gate.
//!
//! ## Overview
//!
//! A credential is a signed claim set: who it was issued to, which channel it
//! opens, and which role it carries. The transport verifies the signature
//! before accepting a publish and attaches the role as a claim to the event it
//! delivers. Clients never get to assert their own role.
//!
//! ## Key Concepts
//!
//! - **Credential**: CBOR-encoded [`CredentialClaims`] plus an Ed25519 signature
//! - **Issuer**: holds the signing key and mints credentials
//! - **Verifier**: holds only the public key; used by the transport
//! - **Provider**: the async seam clients use to (re)obtain credentials
//! - **Gate**: [`can_delete`], the single place delete rights are decided
//!
//! ## Usage
//!
//! ```rust,no_run
//! use claimchat_auth::{can_delete, CredentialIssuer, IssuerConfig};
//! use claimchat_core::{ChannelName, ClientId, Keypair, Role};
//!
//! let issuer = CredentialIssuer::new(Keypair::generate(), IssuerConfig::default());
//! let channel = ChannelName::new("user-claims");
//! let credential = issuer
//!     .issue(&ClientId::new("client-1"), &channel, Role::Moderator)
//!     .unwrap();
//!
//! let verifier = issuer.verifier();
//! // let claims = verifier.verify(&credential, &channel, now)?;
//! ```

pub mod credential;
pub mod error;
pub mod gate;
pub mod issuer;
pub mod provider;

pub use credential::{Credential, CredentialClaims};
pub use error::{AuthError, Result};
pub use gate::{authorize_delete, can_delete, DeleteDecision};
pub use issuer::{CredentialIssuer, CredentialVerifier, IssuerConfig};
pub use provider::{CredentialProvider, LocalCredentialProvider};
