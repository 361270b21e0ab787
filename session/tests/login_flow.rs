//! End-to-end session flows through the store, against a mock server

#![allow(clippy::unwrap_used)] // Test code can unwrap

use serde_json::json;
use smart_entry_api::{ApiClient, SessionHandle};
use smart_entry_runtime::Store;
use smart_entry_session::{
    MemoryTokenCache, SessionAction, SessionEnvironment, SessionPhase, SessionReducer,
    SessionState, TokenCache,
};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type SessionStore =
    Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;

fn login_terminal(action: &SessionAction) -> bool {
    matches!(
        action,
        SessionAction::LoginSucceeded { .. } | SessionAction::LoginFailed { .. }
    )
}

fn store_with(
    server_uri: String,
    handle: SessionHandle,
    cache: Arc<MemoryTokenCache>,
    initial: SessionState,
) -> SessionStore {
    let api = ApiClient::new(server_uri, handle);
    let env = SessionEnvironment::new(api, cache as Arc<dyn TokenCache>);
    Store::new(initial, SessionReducer::new(), env)
}

#[tokio::test]
async fn successful_login_sets_handle_and_persists_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "tok-1",
            "user": {"email": "admin@event.com", "role": "ADMIN"}
        })))
        .mount(&server)
        .await;

    let handle = SessionHandle::new();
    let cache = Arc::new(MemoryTokenCache::new());
    let store = store_with(
        server.uri(),
        handle.clone(),
        Arc::clone(&cache),
        SessionState::new(),
    );

    let result = store
        .send_and_wait_for(
            SessionAction::Login {
                identifier: "admin@event.com".to_string(),
                password: "admin123".to_string(),
            },
            login_terminal,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(matches!(result, SessionAction::LoginSucceeded { .. }));

    // Drain the persistence effect before inspecting side effects
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    assert_eq!(handle.bearer().await, Some("tok-1".to_string()));
    assert_eq!(cache.load(), Some("tok-1".to_string()));
    assert!(store.state(SessionState::is_authenticated).await);
}

#[tokio::test]
async fn rejected_login_leaves_state_unauthenticated() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let handle = SessionHandle::new();
    let cache = Arc::new(MemoryTokenCache::new());
    let store = store_with(
        server.uri(),
        handle.clone(),
        Arc::clone(&cache),
        SessionState::new(),
    );

    let result = store
        .send_and_wait_for(
            SessionAction::Login {
                identifier: "admin@event.com".to_string(),
                password: "wrong".to_string(),
            },
            login_terminal,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

    assert!(matches!(result, SessionAction::LoginFailed { .. }));
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    assert!(!store.state(SessionState::is_authenticated).await);
    assert_eq!(handle.bearer().await, None);
    assert_eq!(cache.load(), None);
}

#[tokio::test]
async fn logout_clears_handle_and_cached_token() {
    let server = MockServer::start().await;

    let handle = SessionHandle::with_token("tok-9");
    let cache = Arc::new(MemoryTokenCache::with_token("tok-9"));
    let store = store_with(
        server.uri(),
        handle.clone(),
        Arc::clone(&cache),
        SessionState::restored("tok-9".to_string()),
    );

    store.send(SessionAction::Logout).await.unwrap();
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    assert_eq!(handle.bearer().await, None);
    assert_eq!(cache.load(), None);
    assert!(
        store
            .state(|s| matches!(s.phase, SessionPhase::Unauthenticated))
            .await
    );
}

#[tokio::test]
async fn observed_auth_failure_tears_the_session_down() {
    let server = MockServer::start().await;

    let handle = SessionHandle::with_token("tok-stale");
    let cache = Arc::new(MemoryTokenCache::with_token("tok-stale"));
    let store = store_with(
        server.uri(),
        handle.clone(),
        Arc::clone(&cache),
        SessionState::restored("tok-stale".to_string()),
    );

    store.send(SessionAction::AuthFailureObserved).await.unwrap();
    store.shutdown(Duration::from_secs(5)).await.unwrap();

    assert_eq!(handle.bearer().await, None);
    assert_eq!(cache.load(), None);
    assert!(!store.state(SessionState::is_authenticated).await);
}
