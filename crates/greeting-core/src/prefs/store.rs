//! Key/value persistence for user preferences.

use std::collections::HashMap;

use thiserror::Error;

/// Why a preference could not be read or written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("preference storage is unavailable: {0}")]
    Unavailable(String),
    #[error("preference storage rejected key {key:?}: {reason}")]
    Rejected { key: String, reason: String },
}

/// Get/set by key. Implementations may fail; callers treat a failed read
/// as "no stored value".
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, also handy for tests and non-browser hosts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("k"), Ok(None));
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k"), Ok(Some("v".to_string())));
    }

    #[test]
    fn error_messages_name_the_key() {
        let err = StoreError::Rejected {
            key: "valentine.motionMode".into(),
            reason: "quota".into(),
        };
        assert!(err.to_string().contains("valentine.motionMode"));
    }
}
