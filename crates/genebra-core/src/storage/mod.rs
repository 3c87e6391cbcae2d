//! Local key/value storage
//!
//! The only persisted state is the bearer token saved under [`TOKEN_KEY`].
//! Its presence is the whole authentication signal: nothing checks expiry
//! or contents.

mod file;

pub use file::FileTokenStore;

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::error::Result;

/// Key the bearer token is stored under
pub const TOKEN_KEY: &str = "jwt_token";

/// String key/value storage, the terminal analogue of browser local storage
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// Accessors for the stored bearer token
pub struct StoredToken;

impl StoredToken {
    pub fn read(store: &dyn TokenStore) -> Result<Option<String>> {
        store.get(TOKEN_KEY)
    }

    pub fn write(store: &dyn TokenStore, token: &str) -> Result<()> {
        store.set(TOKEN_KEY, token)
    }

    pub fn delete(store: &dyn TokenStore) -> Result<()> {
        store.remove(TOKEN_KEY)
    }

    /// True when a non-empty token is stored. Unreadable storage counts
    /// as absent.
    pub fn is_present(store: &dyn TokenStore) -> bool {
        match Self::read(store) {
            Ok(token) => token.is_some_and(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read stored token, treating as absent: {}", e);
                false
            }
        }
    }
}

/// In-memory store, lives as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.lock().insert(TOKEN_KEY.to_string(), token.into());
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
