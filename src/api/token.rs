//! # Session Token Storage
//!
//! The server hands out an opaque token on login. It is kept across runs so
//! the next invocation is still signed in, and sent as `X-Token` on every
//! request.
//!
//! Writes happen only on login, logout, and when the server answers 401.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use log::{debug, warn};

/// File name of the persisted token inside `~/.six-cities/`.
pub const TOKEN_FILE_NAME: &str = "six-cities-token";

/// Where the session token lives between runs.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> Option<String>;

    /// Replaces the stored token.
    fn save(&self, token: &str);

    /// Forgets the stored token. Clearing an empty store is a no-op.
    fn clear(&self);
}

/// Returns `~/.six-cities/six-cities-token`.
pub fn default_token_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".six-cities").join(TOKEN_FILE_NAME))
}

/// Persists the token as a single-line file.
///
/// I/O failures are logged and otherwise ignored: a token that cannot be
/// written just means the next run starts signed out.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically write the token (via `.tmp` + rename).
    fn write(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, token)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    None
                } else {
                    Some(token.to_string())
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&self, token: &str) {
        match self.write(token) {
            Ok(()) => debug!("Token saved to {}", self.path.display()),
            Err(e) => warn!("Failed to save token to {}: {}", self.path.display(), e),
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Token cleared at {}", self.path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to clear token at {}: {}", self.path.display(), e),
        }
    }
}

/// Keeps the token in memory only. Used when no home directory is
/// available, and by tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &str) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_token_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("six-cities-test-{}-{}", std::process::id(), name))
            .join(TOKEN_FILE_NAME)
    }

    #[test]
    fn test_default_token_path_layout() {
        if let Some(path) = default_token_path() {
            assert!(path.ends_with(".six-cities/six-cities-token"));
        }
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);
        store.save("abc");
        assert_eq!(store.load().as_deref(), Some("abc"));
        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_token_path("persist");
        let first = FileTokenStore::new(&path);
        first.save("token-123");

        let second = FileTokenStore::new(&path);
        assert_eq!(second.load().as_deref(), Some("token-123"));

        second.clear();
        assert_eq!(first.load(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_missing_file_is_none() {
        let store = FileTokenStore::new(temp_token_path("missing"));
        assert_eq!(store.load(), None);
        // Clearing a missing token must not fail
        store.clear();
    }

    #[test]
    fn test_file_store_ignores_blank_file() {
        let path = temp_token_path("blank");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::new(&path).load(), None);
        fs::remove_file(&path).unwrap();
    }
}
