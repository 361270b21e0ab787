//! # Smart Entry Session
//!
//! Operator session state machine for the Smart Entry client.
//!
//! The session is a two-state machine — `Unauthenticated` ⇄
//! `Authenticated` — with an explicit in-flight `LoggingIn` phase while
//! the login request is outstanding. The bearer token is the only piece
//! of state surviving a restart: it is persisted through a [`TokenCache`]
//! and restored optimistically at startup, pending validation by the
//! first authenticated request.
//!
//! Teardown happens on logout and on any observed auth-failure response;
//! both clear the shared [`SessionHandle`](smart_entry_api::SessionHandle)
//! and the cached token.

pub mod actions;
pub mod error;
pub mod reducer;
pub mod state;
pub mod token_cache;

pub use actions::SessionAction;
pub use error::SessionError;
pub use reducer::{SessionEnvironment, SessionReducer};
pub use state::{SessionPhase, SessionState};
pub use token_cache::{FileTokenCache, MemoryTokenCache, TokenCache};
