//! Session reducer
//!
//! Pure state machine for login, logout, and auth-failure teardown. The
//! login request, token persistence, and handle updates all happen as
//! effects; the reducer itself never performs I/O.

use crate::actions::SessionAction;
use crate::error::SessionError;
use crate::state::{SessionPhase, SessionState};
use crate::token_cache::TokenCache;
use smart_entry_api::ApiClient;
use smart_entry_core::effect::Effect;
use smart_entry_core::reducer::Reducer;
use smart_entry_core::{SmallVec, smallvec};
use std::sync::Arc;

/// Dependencies injected into the session reducer
#[derive(Clone)]
pub struct SessionEnvironment {
    /// API client; its [`SessionHandle`](smart_entry_api::SessionHandle)
    /// is the shared token every request reads
    pub api: ApiClient,
    /// Token persistence across restarts
    pub tokens: Arc<dyn TokenCache>,
}

impl SessionEnvironment {
    /// Create a new session environment
    #[must_use]
    pub fn new(api: ApiClient, tokens: Arc<dyn TokenCache>) -> Self {
        Self { api, tokens }
    }
}

/// Reducer for the operator session
#[derive(Clone, Debug, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Create a new session reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Teardown effect shared by logout and auth-failure handling:
    /// clears the request handle and the persisted token
    fn teardown_effect(env: &SessionEnvironment) -> Effect<SessionAction> {
        let handle = env.api.session().clone();
        let tokens = Arc::clone(&env.tokens);

        Effect::Future(Box::pin(async move {
            handle.clear().await;
            if let Err(error) = tokens.clear() {
                tracing::warn!(%error, "Failed to clear cached session token");
            }
            None
        }))
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ═══════════════════════════════════════════════════════════
            // Login: validate, flip in-flight, issue the request
            // ═══════════════════════════════════════════════════════════
            SessionAction::Login {
                identifier,
                password,
            } => {
                if matches!(state.phase, SessionPhase::LoggingIn) {
                    tracing::debug!("Login already in flight, ignoring");
                    return smallvec![];
                }

                let identifier = identifier.trim().to_string();
                if identifier.is_empty() {
                    state.last_error = Some(SessionError::MissingField {
                        field: "identifier",
                    });
                    return smallvec![];
                }
                if password.trim().is_empty() {
                    state.last_error = Some(SessionError::MissingField { field: "password" });
                    return smallvec![];
                }

                state.phase = SessionPhase::LoggingIn;
                state.last_error = None;

                let api = env.api.clone();
                smallvec![Effect::Future(Box::pin(async move {
                    match api.login(&identifier, &password).await {
                        Ok(response) => Some(SessionAction::LoginSucceeded {
                            token: response.token,
                            user: response.user,
                        }),
                        Err(error) => Some(SessionAction::LoginFailed {
                            error: SessionError::from_login_failure(&error),
                        }),
                    }
                }))]
            },

            // ═══════════════════════════════════════════════════════════
            // Login outcome events
            // ═══════════════════════════════════════════════════════════
            SessionAction::LoginSucceeded { token, user } => {
                tracing::info!(email = %user.email, role = %user.role, "Login succeeded");
                state.phase = SessionPhase::Authenticated {
                    token: token.clone(),
                    user: Some(user),
                };
                state.last_error = None;

                let handle = env.api.session().clone();
                let tokens = Arc::clone(&env.tokens);
                smallvec![Effect::Future(Box::pin(async move {
                    handle.set(token.clone()).await;
                    if let Err(error) = tokens.store(&token) {
                        tracing::warn!(%error, "Failed to persist session token");
                    }
                    None
                }))]
            },

            SessionAction::LoginFailed { error } => {
                tracing::debug!(%error, "Login failed");
                state.phase = SessionPhase::Unauthenticated;
                state.last_error = Some(error);
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Teardown: logout and observed auth failures
            // ═══════════════════════════════════════════════════════════
            SessionAction::Logout => {
                if matches!(state.phase, SessionPhase::Unauthenticated) {
                    return smallvec![];
                }

                state.phase = SessionPhase::Unauthenticated;
                state.last_error = None;
                smallvec![Self::teardown_effect(env)]
            },

            SessionAction::AuthFailureObserved => {
                if matches!(state.phase, SessionPhase::Unauthenticated) {
                    return smallvec![];
                }

                tracing::warn!("Auth failure observed, tearing down session");
                state.phase = SessionPhase::Unauthenticated;
                state.last_error = Some(SessionError::SessionExpired);
                smallvec![Self::teardown_effect(env)]
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token_cache::MemoryTokenCache;
    use smart_entry_api::{Role, SessionHandle, UserIdentity};
    use smart_entry_testing::{ReducerTest, assertions};

    fn test_env() -> SessionEnvironment {
        let api = ApiClient::new("http://127.0.0.1:9", SessionHandle::new());
        SessionEnvironment::new(api, Arc::new(MemoryTokenCache::new()))
    }

    fn admin_identity() -> UserIdentity {
        UserIdentity {
            email: "admin@event.com".to_string(),
            name: None,
            role: Role::Admin,
        }
    }

    #[test]
    fn login_rejects_empty_identifier_locally() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::new())
            .when_action(SessionAction::Login {
                identifier: "   ".to_string(),
                password: "admin123".to_string(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.last_error,
                    Some(SessionError::MissingField {
                        field: "identifier"
                    })
                );
                assert!(!state.is_authenticated());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn login_rejects_blank_password_locally() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::new())
            .when_action(SessionAction::Login {
                identifier: "admin@event.com".to_string(),
                password: String::new(),
            })
            .then_state(|state| {
                assert_eq!(
                    state.last_error,
                    Some(SessionError::MissingField { field: "password" })
                );
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn login_enters_logging_in_and_issues_request() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::new())
            .when_action(SessionAction::Login {
                identifier: "admin@event.com".to_string(),
                password: "admin123".to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.phase, SessionPhase::LoggingIn);
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn second_login_while_in_flight_is_ignored() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::new())
            .when_actions([
                SessionAction::Login {
                    identifier: "admin@event.com".to_string(),
                    password: "admin123".to_string(),
                },
                SessionAction::Login {
                    identifier: "admin@event.com".to_string(),
                    password: "admin123".to_string(),
                },
            ])
            .then_state(|state| {
                assert_eq!(state.phase, SessionPhase::LoggingIn);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn login_succeeded_authenticates_and_persists() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState {
                phase: SessionPhase::LoggingIn,
                last_error: None,
            })
            .when_action(SessionAction::LoginSucceeded {
                token: "tok-1".to_string(),
                user: admin_identity(),
            })
            .then_state(|state| {
                assert!(state.is_authenticated());
                assert_eq!(
                    state.user().map(|u| u.role),
                    Some(Role::Admin)
                );
            })
            // The persistence side effects run as a Future
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn login_failed_returns_to_unauthenticated() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState {
                phase: SessionPhase::LoggingIn,
                last_error: None,
            })
            .when_action(SessionAction::LoginFailed {
                error: SessionError::InvalidCredentials,
            })
            .then_state(|state| {
                assert_eq!(state.phase, SessionPhase::Unauthenticated);
                assert_eq!(state.last_error, Some(SessionError::InvalidCredentials));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn logout_tears_down_authenticated_session() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::new())
            .when_actions([
                SessionAction::LoginSucceeded {
                    token: "tok-1".to_string(),
                    user: admin_identity(),
                },
                SessionAction::Logout,
            ])
            .then_state(|state| {
                assert_eq!(state.phase, SessionPhase::Unauthenticated);
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn logout_when_unauthenticated_is_a_noop() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::new())
            .when_actions([SessionAction::Logout, SessionAction::Logout])
            .then_state(|state| {
                assert_eq!(state.phase, SessionPhase::Unauthenticated);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn auth_failure_tears_down_with_session_expired() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::restored("tok-stale".to_string()))
            .when_action(SessionAction::AuthFailureObserved)
            .then_state(|state| {
                assert_eq!(state.phase, SessionPhase::Unauthenticated);
                assert_eq!(state.last_error, Some(SessionError::SessionExpired));
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[test]
    fn auth_failure_when_unauthenticated_is_a_noop() {
        ReducerTest::new(SessionReducer::new())
            .with_env(test_env())
            .given_state(SessionState::new())
            .when_action(SessionAction::AuthFailureObserved)
            .then_state(|state| {
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
