//! Role switching.
//!
//! [`RoleSwitch`] is the state machine: two stable roles and a transient
//! `Switching` state. [`RoleSwitchController`] drives it: it asks the
//! credential provider for a credential carrying the other role, rebinds the
//! channel, and only then flips the local mirror. The message log is never
//! touched.
//!
//! Outbound actions are gated by [`RoleSwitchController::outbound`]: refused
//! outright while a switch is in flight, and held back by an exclusive lock
//! for the duration of the rebind.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::{RwLock, RwLockReadGuard};

use claimchat_auth::CredentialProvider;
use claimchat_channel::EventChannel;
use claimchat_core::{ClientId, Role};

use crate::error::{Result, SessionError, SwitchFailure};

/// Where the local role mirror stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    Stable(Role),
    Switching { from: Role, to: Role },
}

/// The role state machine.
#[derive(Debug, Clone)]
pub struct RoleSwitch {
    state: RoleState,
}

impl RoleSwitch {
    pub fn new(role: Role) -> Self {
        Self {
            state: RoleState::Stable(role),
        }
    }

    pub fn state(&self) -> RoleState {
        self.state
    }

    /// The role currently in effect. During a switch this is still the old one.
    pub fn role(&self) -> Role {
        match self.state {
            RoleState::Stable(role) => role,
            RoleState::Switching { from, .. } => from,
        }
    }

    pub fn is_switching(&self) -> bool {
        matches!(self.state, RoleState::Switching { .. })
    }

    /// Enter `Switching`. Returns the target role.
    pub fn begin(&mut self) -> Result<Role> {
        match self.state {
            RoleState::Stable(from) => {
                let to = from.toggled();
                self.state = RoleState::Switching { from, to };
                Ok(to)
            }
            RoleState::Switching { .. } => Err(SessionError::RoleSwitchInProgress),
        }
    }

    /// Finish a switch. Returns the role now in effect.
    pub fn complete(&mut self) -> Role {
        if let RoleState::Switching { to, .. } = self.state {
            self.state = RoleState::Stable(to);
        }
        self.role()
    }

    /// Abandon a switch and restore the previous role.
    pub fn abort(&mut self) -> Role {
        if let RoleState::Switching { from, .. } = self.state {
            self.state = RoleState::Stable(from);
        }
        self.role()
    }
}

/// Held while publishing; a role switch waits for outstanding permits.
pub struct OutboundPermit<'a> {
    _guard: RwLockReadGuard<'a, ()>,
}

/// Drives role switches against a credential provider and a channel.
pub struct RoleSwitchController<P: CredentialProvider> {
    provider: P,
    identity: ClientId,
    state: Mutex<RoleSwitch>,
    /// Shared by publishers, exclusive during a credential rebind.
    outbound: RwLock<()>,
}

impl<P: CredentialProvider> RoleSwitchController<P> {
    pub fn new(provider: P, identity: ClientId, role: Role) -> Self {
        Self {
            provider,
            identity,
            state: Mutex::new(RoleSwitch::new(role)),
            outbound: RwLock::new(()),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, RoleSwitch> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn identity(&self) -> &ClientId {
        &self.identity
    }

    pub fn role(&self) -> Role {
        self.lock_state().role()
    }

    pub fn state(&self) -> RoleState {
        self.lock_state().state()
    }

    pub fn is_switching(&self) -> bool {
        self.lock_state().is_switching()
    }

    /// Obtain and bind a credential for the current role.
    pub async fn bind<C: EventChannel + ?Sized>(&self, channel: &C) -> Result<()> {
        let role = self.role();
        let credential = self
            .provider
            .issue_credential(&self.identity, channel.channel_name(), role)
            .await?;
        channel.authorize(credential).await?;
        Ok(())
    }

    /// Permission to publish.
    ///
    /// Fails closed with [`SessionError::RoleSwitchInProgress`] while a switch
    /// is in flight.
    pub async fn outbound(&self) -> Result<OutboundPermit<'_>> {
        if self.is_switching() {
            return Err(SessionError::RoleSwitchInProgress);
        }
        let guard = self.outbound.read().await;
        Ok(OutboundPermit { _guard: guard })
    }

    /// Toggle between participant and moderator.
    ///
    /// On failure the previous role stays in effect and the channel keeps its
    /// previous credential; the error is retryable.
    pub async fn switch_mode<C: EventChannel + ?Sized>(&self, channel: &C) -> Result<Role> {
        let target = self.lock_state().begin()?;
        tracing::info!(identity = %self.identity, to = %target, "switching role");

        let _exclusive = self.outbound.write().await;
        let outcome = self.rebind(channel, target).await;

        let mut state = self.lock_state();
        match outcome {
            Ok(()) => {
                let role = state.complete();
                tracing::info!(identity = %self.identity, role = %role, "role switched");
                Ok(role)
            }
            Err(source) => {
                let role = state.abort();
                tracing::warn!(
                    identity = %self.identity,
                    kept = %role,
                    error = %source,
                    "role switch failed"
                );
                Err(SessionError::RoleSwitch { target, source })
            }
        }
    }

    async fn rebind<C: EventChannel + ?Sized>(
        &self,
        channel: &C,
        target: Role,
    ) -> std::result::Result<(), SwitchFailure> {
        let credential = self
            .provider
            .issue_credential(&self.identity, channel.channel_name(), target)
            .await?;
        channel.authorize(credential).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_toggles() {
        let mut switch = RoleSwitch::new(Role::Participant);
        assert_eq!(switch.begin().unwrap(), Role::Moderator);
        assert!(switch.is_switching());
        assert_eq!(switch.role(), Role::Participant);
        assert_eq!(switch.complete(), Role::Moderator);
        assert_eq!(switch.state(), RoleState::Stable(Role::Moderator));
    }

    #[test]
    fn test_abort_restores_previous_role() {
        let mut switch = RoleSwitch::new(Role::Moderator);
        switch.begin().unwrap();
        assert_eq!(switch.abort(), Role::Moderator);
        assert!(!switch.is_switching());
    }

    #[test]
    fn test_begin_twice_is_rejected() {
        let mut switch = RoleSwitch::new(Role::Participant);
        switch.begin().unwrap();
        assert!(matches!(
            switch.begin(),
            Err(SessionError::RoleSwitchInProgress)
        ));
    }

    #[test]
    fn test_complete_and_abort_are_noops_when_stable() {
        let mut switch = RoleSwitch::new(Role::Participant);
        assert_eq!(switch.complete(), Role::Participant);
        assert_eq!(switch.abort(), Role::Participant);
    }
}
