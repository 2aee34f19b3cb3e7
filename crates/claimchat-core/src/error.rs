//! Error types for claimchat core.

use thiserror::Error;

/// Errors raised while decoding events or handling key material.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown event kind: {0}")]
    UnknownEvent(String),

    #[error("malformed {name} event: {reason}")]
    MalformedEvent { name: String, reason: String },

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
