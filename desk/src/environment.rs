//! Desk environment
//!
//! Dependencies injected into the desk reducers. The API client carries
//! the shared session handle, so desk requests automatically pick up the
//! bearer token set by the session workflow.

use smart_entry_api::ApiClient;

/// Dependencies for the desk reducers
#[derive(Clone)]
pub struct DeskEnvironment {
    /// API client used by every workflow effect
    pub api: ApiClient,
}

impl DeskEnvironment {
    /// Create a new desk environment
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }
}
