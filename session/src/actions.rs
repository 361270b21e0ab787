//! Session actions
//!
//! Commands come from the operator (login, logout) or from other
//! workflows observing an auth failure; events are produced when the
//! login effect completes.

use crate::error::SessionError;
use smart_entry_api::UserIdentity;

/// All inputs to the session reducer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Operator submitted credentials
    Login {
        /// Email or staff id
        identifier: String,
        /// Password
        password: String,
    },

    /// Login request succeeded (event)
    LoginSucceeded {
        /// Bearer token returned by the server
        token: String,
        /// Authenticated operator identity
        user: UserIdentity,
    },

    /// Login request failed (event)
    LoginFailed {
        /// Why the login failed
        error: SessionError,
    },

    /// Operator requested logout
    Logout,

    /// Some request observed an auth-failure response; tear the session
    /// down and prompt for re-authentication
    AuthFailureObserved,
}
