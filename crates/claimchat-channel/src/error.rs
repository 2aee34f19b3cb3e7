//! Error types for the channel layer.

use thiserror::Error;

/// Errors that can occur on an event channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// No credential has been bound to this channel handle.
    #[error("channel has no credential bound")]
    Unauthenticated,

    /// The bound credential was rejected.
    #[error("credential rejected: {0}")]
    Unauthorized(#[from] claimchat_auth::AuthError),

    /// Delivery failed.
    #[error("transport error: {0}")]
    TransportError(String),
}

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;
