use thiserror::Error;
use uuid::Uuid;

/// Storage key holding the session identifier.
pub const SESSION_KEY: &str = "sitechat_session_id";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("persistent storage unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// Persistent client-side key/value storage. The widget only ever touches
/// one key, but the seam keeps tests off the real localStorage.
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `SessionStore` backed by the browser's localStorage.
pub struct BrowserStorage {
    storage: Option<web_sys::Storage>,
}

impl BrowserStorage {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
        Self { storage }
    }
}

impl Default for BrowserStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|e| StorageError::Read(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}

/// Read the stored session identifier, or generate, persist, and return a
/// fresh one. Stable across calls within a browser profile until the
/// storage is cleared.
pub fn get_or_create_session_id(store: &dyn SessionStore) -> Result<String, StorageError> {
    if let Some(existing) = store.get(SESSION_KEY)? {
        if !existing.is_empty() {
            return Ok(existing);
        }
    }

    let fresh = Uuid::new_v4().to_string();
    store.set(SESSION_KEY, &fresh)?;
    Ok(fresh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        values: RefCell<HashMap<String, String>>,
    }

    impl MemoryStore {
        fn clear(&self) {
            self.values.borrow_mut().clear();
        }
    }

    impl SessionStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.values.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn same_value_across_calls() {
        let store = MemoryStore::default();
        let first = get_or_create_session_id(&store).unwrap();
        let second = get_or_create_session_id(&store).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fresh_value_after_clearing() {
        let store = MemoryStore::default();
        let first = get_or_create_session_id(&store).unwrap();
        store.clear();
        let second = get_or_create_session_id(&store).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn existing_value_is_reused() {
        let store = MemoryStore::default();
        store.set(SESSION_KEY, "profile-42").unwrap();
        assert_eq!(get_or_create_session_id(&store).unwrap(), "profile-42");
    }

    #[test]
    fn blank_value_is_regenerated() {
        let store = MemoryStore::default();
        store.set(SESSION_KEY, "").unwrap();
        let id = get_or_create_session_id(&store).unwrap();
        assert!(!id.is_empty());
        assert_eq!(store.get(SESSION_KEY).unwrap().unwrap(), id);
    }
}
