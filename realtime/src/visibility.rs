//! "Page became visible again" signal.
//!
//! One collaborator shared by every feed, instead of each feed installing
//! its own global listener.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::lock;

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

#[derive(Clone, Default)]
pub struct VisibilitySignal {
    inner: Arc<Inner>,
}

impl VisibilitySignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` until the returned guard is dropped.
    pub fn on_visible(&self, listener: impl Fn() + Send + Sync + 'static) -> VisibilityGuard {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.inner.listeners).push((id, Arc::new(listener)));
        VisibilityGuard {
            signal: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Fans the signal out to every listener. Returns how many ran.
    pub fn notify_visible(&self) -> usize {
        let listeners: Vec<Listener> = lock(&self.inner.listeners)
            .iter()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in &listeners {
            listener();
        }
        listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }
}

pub struct VisibilityGuard {
    signal: Weak<Inner>,
    id: u64,
}

impl Drop for VisibilityGuard {
    fn drop(&mut self) {
        if let Some(inner) = self.signal.upgrade() {
            lock(&inner.listeners).retain(|(id, _)| *id != self.id);
        }
    }
}
