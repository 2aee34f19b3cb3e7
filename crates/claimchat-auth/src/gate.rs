//! The delete authorization gate.
//!
//! Moderators may delete any message. Everyone else may delete only messages
//! whose author matches the name on the delete request. A missing claim, or
//! any claim other than `"moderator"`, is the non-moderator case.
//!
//! Inputs are the verified claim from the delivered event and the target
//! message. The local role mirror is never an input.

use claimchat_core::{Claim, Message};

/// Why a delete was or was not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDecision {
    /// Claim is moderator; authorship does not matter.
    Moderator,
    /// Non-moderator deleting their own message.
    Owner,
    /// Non-moderator deleting someone else's message.
    Denied,
}

impl DeleteDecision {
    pub fn is_allowed(self) -> bool {
        !matches!(self, DeleteDecision::Denied)
    }
}

/// Decide whether `deleting_author`, holding `claim`, may delete `message`.
pub fn authorize_delete(
    message: &Message,
    deleting_author: &str,
    claim: Option<&Claim>,
) -> DeleteDecision {
    if claim.is_some_and(Claim::is_moderator) {
        DeleteDecision::Moderator
    } else if deleting_author == message.author() {
        DeleteDecision::Owner
    } else {
        DeleteDecision::Denied
    }
}

/// Boolean form of [`authorize_delete`].
pub fn can_delete(message: &Message, deleting_author: &str, claim: Option<&Claim>) -> bool {
    authorize_delete(message, deleting_author, claim).is_allowed()
}
