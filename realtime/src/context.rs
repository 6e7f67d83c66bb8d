//! Explicit context object handed to every subscription and feed.

use std::sync::Arc;

use crate::cache::{MemoryQueryCache, QueryCache};
use crate::notify::{Notifier, TracingNotifier};
use crate::registry::TopicRegistry;
use crate::router::DispatchRouter;
use crate::seed::ApiClient;
use crate::session::{MemorySessionStore, SessionStore};
use crate::transport::ConnectionState;
use crate::visibility::VisibilitySignal;

/// Everything the real-time layer shares across subscribers: the registry,
/// the router, the connection flag and the injected collaborators.
///
/// Cloning is cheap and every clone refers to the same state.
#[derive(Clone)]
pub struct RealtimeContext {
    registry: Arc<TopicRegistry>,
    router: DispatchRouter,
    cache: Arc<dyn QueryCache>,
    connection: ConnectionState,
    visibility: VisibilitySignal,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    api: Option<ApiClient>,
}

#[derive(Default)]
pub struct RealtimeContextBuilder {
    cache: Option<Arc<dyn QueryCache>>,
    session: Option<Arc<dyn SessionStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    visibility: Option<VisibilitySignal>,
    api: Option<ApiClient>,
}

impl RealtimeContextBuilder {
    pub fn cache(mut self, cache: Arc<dyn QueryCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.session = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn visibility(mut self, signal: VisibilitySignal) -> Self {
        self.visibility = Some(signal);
        self
    }

    pub fn api_client(mut self, api: ApiClient) -> Self {
        self.api = Some(api);
        self
    }

    pub fn build(self) -> RealtimeContext {
        let registry = Arc::new(TopicRegistry::new());
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(MemoryQueryCache::new()));
        RealtimeContext {
            router: DispatchRouter::new(registry.clone(), cache.clone()),
            registry,
            cache,
            connection: ConnectionState::new(),
            visibility: self.visibility.unwrap_or_default(),
            session: self
                .session
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            api: self.api,
        }
    }
}

impl RealtimeContext {
    pub fn builder() -> RealtimeContextBuilder {
        RealtimeContextBuilder::default()
    }

    pub fn registry(&self) -> &Arc<TopicRegistry> {
        &self.registry
    }

    pub fn router(&self) -> &DispatchRouter {
        &self.router
    }

    pub fn cache(&self) -> Arc<dyn QueryCache> {
        self.cache.clone()
    }

    pub fn connection(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn visibility(&self) -> &VisibilitySignal {
        &self.visibility
    }

    pub fn session(&self) -> Arc<dyn SessionStore> {
        self.session.clone()
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub fn api(&self) -> Option<&ApiClient> {
        self.api.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    pub fn set_connected(&self, connected: bool) {
        if self.connection.set(connected) {
            tracing::debug!(connected, "realtime connection state changed");
        }
    }

    /// Entry point for inbound text frames.
    pub fn dispatch_frame(&self, raw: &str) -> usize {
        self.router.dispatch_frame(raw)
    }

    /// Page/tab became visible again.
    pub fn notify_visible(&self) -> usize {
        self.visibility.notify_visible()
    }
}
