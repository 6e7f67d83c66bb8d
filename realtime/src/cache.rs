//! Query cache seam.
//!
//! The real-time layer never writes cached values; it only marks keys stale
//! so that whatever owns the cache refetches them on next access.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::lock;

/// The one mutation the real-time layer performs on a cache.
pub trait QueryCache: Send + Sync {
    fn invalidate(&self, key: &str);
}

#[derive(Debug, Default)]
struct Slot {
    value: Option<Value>,
    stale: bool,
    invalidations: u64,
}

/// In-process cache keyed by endpoint path (`/api/leads`, ...).
#[derive(Debug, Default)]
pub struct MemoryQueryCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl MemoryQueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly fetched value and clears the stale flag.
    pub fn set(&self, key: &str, value: Value) {
        let mut slots = lock(&self.slots);
        let slot = slots.entry(key.to_string()).or_default();
        slot.value = Some(value);
        slot.stale = false;
    }

    /// Returns the cached value, or `None` when missing or stale.
    pub fn get(&self, key: &str) -> Option<Value> {
        let slots = lock(&self.slots);
        slots
            .get(key)
            .filter(|s| !s.stale)
            .and_then(|s| s.value.clone())
    }

    /// A missing key counts as stale: it has to be fetched either way.
    pub fn is_stale(&self, key: &str) -> bool {
        lock(&self.slots).get(key).is_none_or(|s| s.stale || s.value.is_none())
    }

    pub fn invalidation_count(&self, key: &str) -> u64 {
        lock(&self.slots).get(key).map_or(0, |s| s.invalidations)
    }
}

impl QueryCache for MemoryQueryCache {
    fn invalidate(&self, key: &str) {
        let mut slots = lock(&self.slots);
        let slot = slots.entry(key.to_string()).or_default();
        slot.stale = true;
        slot.invalidations += 1;
        tracing::trace!(key, "query invalidated");
    }
}
