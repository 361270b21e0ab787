//! Configuration for the operator shell
//!
//! Loaded from environment variables with hardcoded fallbacks.

use smart_entry_session::FileTokenCache;
use std::env;
use std::path::PathBuf;

/// Shell configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Smart Entry API
    pub api_url: String,
    /// Override for the token cache location
    pub token_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// - `SMART_ENTRY_API_URL`: API base URL (default
    ///   `http://localhost:4000`)
    /// - `SMART_ENTRY_TOKEN_PATH`: token cache file (default under the OS
    ///   config directory)
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_url: env::var("SMART_ENTRY_API_URL")
                .unwrap_or_else(|_| smart_entry_api::client::DEFAULT_BASE_URL.to_string()),
            token_path: env::var("SMART_ENTRY_TOKEN_PATH").ok().map(PathBuf::from),
        }
    }

    /// The token cache this shell persists the session token through
    #[must_use]
    pub fn token_cache(&self) -> FileTokenCache {
        match &self.token_path {
            Some(path) => FileTokenCache::new(path.clone()),
            None => FileTokenCache::default_location()
                .unwrap_or_else(|| FileTokenCache::new(PathBuf::from(".smart-entry-token"))),
        }
    }
}
