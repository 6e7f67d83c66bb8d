//! Client-side real-time layer for the raccordement back office.
//!
//! One shared channel carries `{type, payload}` envelopes for a closed set of
//! [`Topic`]s. Interested parties register through a [`DataSubscription`] (or
//! one of the derived [`feeds`]); the [`DispatchRouter`] fans each envelope
//! out to the live subscribers of its topic and invalidates the cache keys
//! they declared.
//!
//! Nothing here is a hidden singleton: every collaborator hangs off an
//! explicit [`RealtimeContext`] that callers pass around, so tests can drive
//! the whole layer without a network connection.

pub mod cache;
pub mod config;
pub mod context;
pub mod envelope;
pub mod error;
pub mod feed;
pub mod feeds;
pub mod format;
pub mod notify;
pub mod registry;
pub mod router;
pub mod seed;
pub mod session;
pub mod subscription;
pub mod topic;
pub mod transport;
pub mod visibility;

pub use cache::{MemoryQueryCache, QueryCache};
pub use config::{RealtimeConfig, ReconnectPolicy};
pub use context::RealtimeContext;
pub use envelope::{Envelope, decode_frame};
pub use error::RealtimeError;
pub use feed::{FEED_CAPACITY, FeedOptions, LiveFeed, RollingBuffer};
pub use notify::{Notifier, Toast, ToastKind, TracingNotifier};
pub use registry::{SubscriberId, TopicRegistry};
pub use router::DispatchRouter;
pub use seed::ApiClient;
pub use session::{MemorySessionStore, SessionStore, SessionStoreError};
pub use subscription::{DataSubscription, SubscriptionOptions};
pub use topic::Topic;
pub use transport::{Backoff, ChannelTransport, ConnectionState, WsChannel};
pub use visibility::{VisibilityGuard, VisibilitySignal};

/// Locks a mutex, recovering the guard if a previous holder panicked.
///
/// Subscriber callbacks are user code; a panic inside one must not wedge
/// every other subscriber sharing the same state.
pub(crate) fn lock<T>(m: &std::sync::Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
