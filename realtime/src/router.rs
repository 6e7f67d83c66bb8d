//! Demultiplexes inbound envelopes to subscribers and side-effects the cache.

use std::sync::Arc;

use crate::cache::QueryCache;
use crate::envelope::{Envelope, decode_frame};
use crate::registry::TopicRegistry;

#[derive(Clone)]
pub struct DispatchRouter {
    registry: Arc<TopicRegistry>,
    cache: Arc<dyn QueryCache>,
}

impl DispatchRouter {
    pub fn new(registry: Arc<TopicRegistry>, cache: Arc<dyn QueryCache>) -> Self {
        Self { registry, cache }
    }

    /// Delivers `envelope` to every live subscriber of its topic, in
    /// registration order. After each callback, that subscriber's cache keys
    /// are invalidated. Returns the number of callbacks invoked.
    ///
    /// A topic with no subscribers swallows the event; nothing is buffered.
    pub fn dispatch(&self, envelope: &Envelope) -> usize {
        let mut delivered = 0;
        for sub in self.registry.snapshot(envelope.topic) {
            if !sub.deliver(&envelope.payload) {
                continue;
            }
            delivered += 1;
            for key in sub.cache_keys() {
                self.cache.invalidate(key);
            }
        }
        delivered
    }

    /// Decodes a raw text frame and dispatches it. Unknown topics are dropped
    /// without logging.
    pub fn dispatch_frame(&self, raw: &str) -> usize {
        match decode_frame(raw) {
            Ok(Some(envelope)) => self.dispatch(&envelope),
            Ok(None) => 0,
            Err(e) => {
                tracing::debug!(error = %e, "dropping malformed realtime frame");
                0
            }
        }
    }
}
