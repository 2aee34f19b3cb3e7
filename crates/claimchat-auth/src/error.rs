//! Error types for credentials and authorization.

use thiserror::Error;

/// Errors that can occur while issuing or verifying credentials.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token text could not be parsed.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Signature does not match the issuer's key.
    #[error("credential signature is invalid")]
    SignatureInvalid,

    /// Credential was issued for another channel.
    #[error("credential is for channel {got}, not {expected}")]
    WrongChannel { expected: String, got: String },

    /// Credential is past its expiry.
    #[error("credential expired at {expires_at} (now {now})")]
    Expired { expires_at: i64, now: i64 },

    /// Claims could not be encoded or decoded.
    #[error("encoding error: {0}")]
    EncodingError(String),

    /// The provider could not mint a credential.
    #[error("credential issuance failed: {0}")]
    IssuanceFailed(String),

    /// Core error.
    #[error("core error: {0}")]
    CoreError(#[from] claimchat_core::CoreError),
}

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
