//! Error types for chat sessions.

use claimchat_auth::AuthError;
use claimchat_channel::ChannelError;
use claimchat_core::Role;
use thiserror::Error;

/// Errors that can occur during session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Channel error (publish, subscribe, history).
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Initial credential could not be obtained.
    #[error("credential error: {0}")]
    Credential(#[from] AuthError),

    /// Outbound actions are disabled while a role switch is in flight.
    #[error("role switch in progress")]
    RoleSwitchInProgress,

    /// A role switch failed; the previous role is still in effect.
    #[error("could not switch to {target} role: {source}")]
    RoleSwitch {
        target: Role,
        #[source]
        source: SwitchFailure,
    },

    /// The reducer task has stopped.
    #[error("session closed")]
    Closed,
}

/// What went wrong during a role switch.
#[derive(Debug, Error)]
pub enum SwitchFailure {
    #[error("credential issuance failed: {0}")]
    Issue(#[from] AuthError),

    #[error("credential rebind failed: {0}")]
    Rebind(#[from] ChannelError),
}

impl SessionError {
    /// Whether the same action may succeed if tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SessionError::Channel(ChannelError::TransportError(_))
                | SessionError::Channel(ChannelError::Unauthorized(AuthError::Expired { .. }))
                | SessionError::Credential(AuthError::Expired { .. })
                | SessionError::Credential(AuthError::IssuanceFailed(_))
                | SessionError::RoleSwitchInProgress
                | SessionError::RoleSwitch { .. }
        )
    }
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_and_issuance_failures_are_retryable() {
        let expired = AuthError::Expired {
            expires_at: 10,
            now: 20,
        };
        assert!(SessionError::Channel(ChannelError::Unauthorized(expired)).is_retryable());
        assert!(SessionError::Credential(AuthError::IssuanceFailed("down".into())).is_retryable());
        assert!(SessionError::Channel(ChannelError::TransportError("offline".into())).is_retryable());
    }

    #[test]
    fn test_rejected_credentials_are_not_retryable() {
        assert!(!SessionError::Channel(ChannelError::Unauthorized(AuthError::SignatureInvalid))
            .is_retryable());
        assert!(!SessionError::Channel(ChannelError::Unauthenticated).is_retryable());
        assert!(!SessionError::Closed.is_retryable());
    }
}
