//! Topic registry: which callbacks want which topic.

use serde_json::Value;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use crate::lock;
use crate::topic::Topic;

/// Subscriber callback. Receives the envelope payload by reference.
pub type Callback = Arc<dyn Fn(&Value) + Send + Sync>;

/// Handle identifying one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId {
    topic: Topic,
    seq: u64,
}

impl SubscriberId {
    pub fn topic(&self) -> Topic {
        self.topic
    }
}

pub(crate) struct Subscriber {
    id: SubscriberId,
    callback: Callback,
    cache_keys: Vec<String>,
    /// Held for the whole callback invocation; `retire` takes it to flip the
    /// flag, so once `retire` returns no invocation is running or can start.
    live: Mutex<bool>,
}

impl Subscriber {
    pub(crate) fn cache_keys(&self) -> &[String] {
        &self.cache_keys
    }

    /// Runs the callback unless the subscriber was retired. Returns whether
    /// it ran. A panicking callback is contained and logged.
    pub(crate) fn deliver(&self, payload: &Value) -> bool {
        let live = lock(&self.live);
        if !*live {
            return false;
        }
        if catch_unwind(AssertUnwindSafe(|| (self.callback)(payload))).is_err() {
            tracing::error!(topic = %self.id.topic, "realtime subscriber panicked");
        }
        true
    }

    fn retire(&self) {
        *lock(&self.live) = false;
    }
}

/// Maps each topic to its subscribers, in registration order.
///
/// Each subscriber's liveness lock is held while its callback runs, and it
/// is not reentrant. From inside a callback, never:
/// - drop or unsubscribe its own subscription (retirement waits for the
///   running invocation);
/// - dispatch a frame on the topic being delivered (the nested delivery
///   waits on the same lock).
///
/// Both deadlock. Dispatching to a different topic is fine.
#[derive(Default)]
pub struct TopicRegistry {
    next_seq: AtomicU64,
    topics: RwLock<HashMap<Topic, Vec<Arc<Subscriber>>>>,
}

impl TopicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, topic: Topic, callback: Callback, cache_keys: Vec<String>) -> SubscriberId {
        let id = SubscriberId {
            topic,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        let sub = Arc::new(Subscriber {
            id,
            callback,
            cache_keys,
            live: Mutex::new(true),
        });
        self.topics
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push(sub);
        tracing::debug!(%topic, seq = id.seq, "realtime subscriber registered");
        id
    }

    /// Removes a registration. Returns `false` if it was already gone.
    pub fn deregister(&self, id: SubscriberId) -> bool {
        let removed = {
            let mut topics = self
                .topics
                .write()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let Some(subs) = topics.get_mut(&id.topic) else {
                return false;
            };
            let pos = subs.iter().position(|s| s.id == id);
            let removed = pos.map(|p| subs.remove(p));
            if subs.is_empty() {
                topics.remove(&id.topic);
            }
            removed
        };

        match removed {
            Some(sub) => {
                // Outside the registry lock: an in-flight delivery may still
                // hold the subscriber's gate.
                sub.retire();
                tracing::debug!(topic = %id.topic, seq = id.seq, "realtime subscriber removed");
                true
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topics
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&topic)
            .map_or(0, Vec::len)
    }

    pub fn total_subscribers(&self) -> usize {
        self.topics
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .values()
            .map(Vec::len)
            .sum()
    }

    /// Subscribers of `topic` at this instant, in registration order.
    pub(crate) fn snapshot(&self, topic: Topic) -> Vec<Arc<Subscriber>> {
        self.topics
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&topic)
            .cloned()
            .unwrap_or_default()
    }
}
