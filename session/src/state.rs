//! Session state types

use crate::error::SessionError;
use smart_entry_api::UserIdentity;

/// Phase of the session state machine
///
/// `Unauthenticated` → `LoggingIn` → `Authenticated` on success, back to
/// `Unauthenticated` on failure, logout, or an observed auth-failure
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No valid token held
    #[default]
    Unauthenticated,

    /// Login request in flight; further logins are rejected locally
    LoggingIn,

    /// A token is held and attached to every request
    Authenticated {
        /// The bearer token
        token: String,
        /// Operator identity from login; `None` when the session was
        /// restored from a cached token and no login happened yet
        user: Option<UserIdentity>,
    },
}

/// Root session state managed by the session reducer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    /// Current machine phase
    pub phase: SessionPhase,
    /// Most recent session error, for display
    pub last_error: Option<SessionError>,
}

impl SessionState {
    /// Fresh unauthenticated state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Optimistic state for a token restored from the cache at startup
    ///
    /// The identity is unknown until the operator logs in again; the
    /// token is trusted until a request observes an auth failure.
    #[must_use]
    pub const fn restored(token: String) -> Self {
        Self {
            phase: SessionPhase::Authenticated { token, user: None },
            last_error: None,
        }
    }

    /// Returns `true` when a token is held
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.phase, SessionPhase::Authenticated { .. })
    }

    /// The authenticated operator identity, when known
    #[must_use]
    pub const fn user(&self) -> Option<&UserIdentity> {
        match &self.phase {
            SessionPhase::Authenticated { user, .. } => user.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_unauthenticated() {
        let state = SessionState::new();
        assert!(!state.is_authenticated());
        assert!(state.user().is_none());
    }

    #[test]
    fn restored_state_is_authenticated_without_identity() {
        let state = SessionState::restored("tok-1".to_string());
        assert!(state.is_authenticated());
        assert!(state.user().is_none());
    }
}
