//! Error types for session operations

use smart_entry_api::ApiError;
use thiserror::Error;

/// Failures surfaced by the session workflow
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Login was rejected by the server
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// A required login field was empty; never reaches the network
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field
        field: &'static str,
    },

    /// A request was rejected for a missing or expired token
    #[error("Session expired, please log in again")]
    SessionExpired,

    /// The login request could not complete
    #[error("Login failed: {0}")]
    Transport(String),
}

impl SessionError {
    /// Returns `true` if this error is due to operator input rather than
    /// the transport or the server
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::MissingField { .. })
    }

    /// Map an API failure during login onto the session taxonomy
    #[must_use]
    pub fn from_login_failure(error: &ApiError) -> Self {
        if error.is_auth_failure() {
            Self::InvalidCredentials
        } else {
            Self::Transport(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_login_maps_to_invalid_credentials() {
        let error = SessionError::from_login_failure(&ApiError::Unauthorized);
        assert_eq!(error, SessionError::InvalidCredentials);
        assert!(error.is_user_error());
    }

    #[test]
    fn network_login_failure_maps_to_transport() {
        let error = SessionError::from_login_failure(&ApiError::Network("refused".into()));
        assert!(matches!(error, SessionError::Transport(_)));
        assert!(!error.is_user_error());
    }
}
