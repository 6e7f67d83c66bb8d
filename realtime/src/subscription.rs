//! Lifetime-bound subscription to one topic.

use serde_json::Value;
use std::sync::Arc;

use crate::context::RealtimeContext;
use crate::registry::{Callback, SubscriberId, TopicRegistry};
use crate::topic::Topic;
use crate::transport::ConnectionState;

pub struct SubscriptionOptions {
    pub data_type: Topic,
    pub query_keys_to_invalidate: Vec<String>,
    pub on_new_data: Option<Callback>,
}

impl SubscriptionOptions {
    pub fn new<I, K>(data_type: Topic, query_keys_to_invalidate: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            data_type,
            query_keys_to_invalidate: query_keys_to_invalidate.into_iter().map(Into::into).collect(),
            on_new_data: None,
        }
    }

    pub fn on_new_data(mut self, f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_new_data = Some(Arc::new(f));
        self
    }
}

/// Registration against the topic registry, undone when dropped.
///
/// `on_new_data` runs at most once per matching envelope and never after the
/// subscription is gone. Events published while the channel is down are not
/// seen.
pub struct DataSubscription {
    id: SubscriberId,
    registry: Arc<TopicRegistry>,
    connection: ConnectionState,
}

impl DataSubscription {
    pub fn new(ctx: &RealtimeContext, options: SubscriptionOptions) -> Self {
        // Even without a callback the registration is what drives cache
        // invalidation for the declared keys.
        let callback = options
            .on_new_data
            .unwrap_or_else(|| Arc::new(|_: &Value| {}));
        let id = ctx.registry().register(
            options.data_type,
            callback,
            options.query_keys_to_invalidate,
        );
        Self {
            id,
            registry: ctx.registry().clone(),
            connection: ctx.connection().clone(),
        }
    }

    pub fn topic(&self) -> Topic {
        self.id.topic()
    }

    /// State of the shared channel, identical for every topic.
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Explicit teardown; same effect as dropping.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for DataSubscription {
    fn drop(&mut self) {
        self.registry.deregister(self.id);
    }
}
