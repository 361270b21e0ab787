//! Shared bearer-token handle
//!
//! The session token is the only shared mutable resource in the client:
//! every outgoing request reads it, and only login, logout, and
//! auth-failure teardown write it. Holding it behind an explicit handle
//! keeps the lifecycle visible — init on login, teardown on logout or
//! auth failure, never implicit.

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the current bearer token
///
/// Cloning the handle shares the underlying token; the API client and the
/// session workflow hold clones of the same handle.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    token: Arc<RwLock<Option<String>>>,
}

impl SessionHandle {
    /// Create an empty (unauthenticated) handle
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handle pre-populated with a token restored from the cache
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    /// Store a bearer token (login)
    pub async fn set(&self, token: impl Into<String>) {
        *self.token.write().await = Some(token.into());
    }

    /// Clear the bearer token (logout or auth-failure teardown)
    pub async fn clear(&self) {
        *self.token.write().await = None;
    }

    /// Current bearer token, if any
    pub async fn bearer(&self) -> Option<String> {
        self.token.read().await.clone()
    }

    /// Returns `true` if a token is currently held
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_unauthenticated() {
        let handle = SessionHandle::new();
        assert!(!handle.is_authenticated().await);
        assert_eq!(handle.bearer().await, None);
    }

    #[tokio::test]
    async fn set_and_clear_round_trip() {
        let handle = SessionHandle::new();
        handle.set("tok-123").await;
        assert_eq!(handle.bearer().await, Some("tok-123".to_string()));

        handle.clear().await;
        assert!(!handle.is_authenticated().await);
    }

    #[tokio::test]
    async fn clones_share_the_token() {
        let handle = SessionHandle::new();
        let clone = handle.clone();
        handle.set("tok-456").await;
        assert_eq!(clone.bearer().await, Some("tok-456".to_string()));
    }
}
