//! Session-scoped, non-durable key/value store used as a cross-feed signal.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

use crate::lock;

#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("session store unavailable")]
    Unavailable,
    #[error("session store quota exceeded for key '{0}'")]
    QuotaExceeded(String),
}

pub trait SessionStore: Send + Sync {
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError>;
    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn set(&self, key: &str, value: &str) -> Result<(), SessionStoreError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>, SessionStoreError> {
        Ok(lock(&self.entries).get(key).cloned())
    }
}
