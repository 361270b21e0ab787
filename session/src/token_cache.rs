//! Token persistence
//!
//! The bearer token is the only domain state that survives a restart.
//! It lives in a single file under the OS config directory (or an
//! explicit override path), keyed by nothing but its fixed location —
//! the moral equivalent of the browser client's fixed local-storage key.

use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

/// Storage for the persisted bearer token
pub trait TokenCache: Send + Sync {
    /// Load the cached token, if one is present and non-empty
    fn load(&self) -> Option<String>;

    /// Persist a token, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the token cannot be written.
    fn store(&self, token: &str) -> io::Result<()>;

    /// Remove the cached token; a missing cache is not an error
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when removal fails for a reason
    /// other than the file not existing.
    fn clear(&self) -> io::Result<()>;
}

/// File-backed token cache
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    /// Cache at an explicit path
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Cache at the default location under the OS config directory
    ///
    /// Returns `None` when the platform has no config directory.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("smart-entry").join("token")))
    }

    /// The file this cache reads and writes
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl TokenCache for FileTokenCache {
    fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn store(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory token cache for tests
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    token: Mutex<Option<String>>,
}

impl MemoryTokenCache {
    /// Empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-populated with a token
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenCache for MemoryTokenCache {
    fn load(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    fn store(&self, token: &str) -> io::Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
        Ok(())
    }
}
