//! Roles and claims.
//!
//! A [`Role`] is the local client's mirror of which credential it holds. A
//! [`Claim`] is the value the transport extracted from the publisher's
//! credential and attached to a delivered event. The two are kept as separate
//! types so UI state can never stand in for a verified claim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire spelling of the participant role.
pub const PARTICIPANT_CLAIM: &str = "user";

/// Wire spelling of the moderator role.
pub const MODERATOR_CLAIM: &str = "moderator";

/// Role requested from the credential issuer and mirrored locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// May delete only their own messages.
    #[default]
    #[serde(rename = "user")]
    Participant,

    /// May delete anyone's messages.
    #[serde(rename = "moderator")]
    Moderator,
}

impl Role {
    /// The claim string a credential for this role carries.
    pub fn claim_str(self) -> &'static str {
        match self {
            Role::Participant => PARTICIPANT_CLAIM,
            Role::Moderator => MODERATOR_CLAIM,
        }
    }

    /// The other role.
    pub fn toggled(self) -> Self {
        match self {
            Role::Participant => Role::Moderator,
            Role::Moderator => Role::Participant,
        }
    }

    pub fn is_moderator(self) -> bool {
        self == Role::Moderator
    }

    /// One-line description of what this role may delete.
    pub fn summary(self) -> &'static str {
        match self {
            Role::Participant => "You can delete your own messages",
            Role::Moderator => "You can delete everyone's messages",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Participant => f.write_str("participant"),
            Role::Moderator => f.write_str("moderator"),
        }
    }
}

/// A claim attached to an event by the transport.
///
/// Kept as the raw string the transport delivered. Only the exact value
/// `"moderator"` confers moderator rights; anything else, including values this
/// version does not recognise, is treated as an ordinary participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claim(String);

impl Claim {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_moderator(&self) -> bool {
        self.0 == MODERATOR_CLAIM
    }

    /// The role this claim grants.
    pub fn role(&self) -> Role {
        if self.is_moderator() {
            Role::Moderator
        } else {
            Role::Participant
        }
    }
}

impl From<Role> for Claim {
    fn from(role: Role) -> Self {
        Self(role.claim_str().to_string())
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_spelling() {
        assert_eq!(serde_json::to_string(&Role::Participant).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&Role::Moderator).unwrap(),
            "\"moderator\""
        );
        let parsed: Role = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(parsed, Role::Moderator);
    }

    #[test]
    fn test_toggle_is_an_involution() {
        assert_eq!(Role::Participant.toggled(), Role::Moderator);
        assert_eq!(Role::Participant.toggled().toggled(), Role::Participant);
    }

    #[test]
    fn test_summary_matches_role() {
        assert!(Role::Moderator.summary().contains("everyone's"));
        assert!(Role::Participant.summary().contains("your own"));
    }

    #[test]
    fn test_only_exact_moderator_claim_is_moderator() {
        assert!(Claim::new("moderator").is_moderator());
        assert!(!Claim::new("user").is_moderator());
        assert!(!Claim::new("Moderator").is_moderator());
        assert!(!Claim::new("").is_moderator());
        assert_eq!(Claim::new("admin").role(), Role::Participant);
    }

    #[test]
    fn test_claim_from_role() {
        assert_eq!(Claim::from(Role::Moderator).as_str(), "moderator");
        assert_eq!(Claim::from(Role::Participant).as_str(), "user");
    }
}
