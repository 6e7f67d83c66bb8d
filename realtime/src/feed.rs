//! Derived feeds: a subscription plus a rolling buffer of recent payloads,
//! a "new items" counter, an optional toast and a visibility reset.

use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::context::RealtimeContext;
use crate::lock;
use crate::notify::{Toast, notify_best_effort};
use crate::subscription::{DataSubscription, SubscriptionOptions};
use crate::topic::Topic;
use crate::visibility::VisibilityGuard;

/// How many recent payloads a feed keeps.
pub const FEED_CAPACITY: usize = 10;

/// Bounded, newest-first sequence.
#[derive(Debug, Clone)]
pub struct RollingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> RollingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push_front(item);
        self.items.truncate(self.capacity);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.front()
    }

    /// Newest first.
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

pub type Formatter = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
pub type ToastFormatter = Arc<dyn Fn(&Value) -> Toast + Send + Sync>;

#[derive(Clone, Default)]
pub struct FeedOptions {
    pub query_keys: Vec<String>,
    /// Applied to each payload before buffering. Identity when `None`.
    pub formatter: Option<Formatter>,
    pub toast: Option<ToastFormatter>,
    pub show_notifications: bool,
}

impl FeedOptions {
    pub fn new<I, K>(query_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            query_keys: query_keys.into_iter().map(Into::into).collect(),
            formatter: None,
            toast: None,
            show_notifications: true,
        }
    }

    pub fn with_formatter(mut self, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        self.formatter = Some(Arc::new(f));
        self
    }

    pub fn with_toast(mut self, f: impl Fn(&Value) -> Toast + Send + Sync + 'static) -> Self {
        self.toast = Some(Arc::new(f));
        self
    }

    pub fn show_notifications(mut self, show: bool) -> Self {
        self.show_notifications = show;
        self
    }
}

#[derive(Debug)]
struct FeedState {
    items: RollingBuffer<Value>,
    count: u64,
}

impl FeedState {
    fn new() -> Self {
        Self {
            items: RollingBuffer::new(FEED_CAPACITY),
            count: 0,
        }
    }

    fn reset(&mut self) {
        self.items.clear();
        self.count = 0;
    }
}

/// `idle → subscribed → (receive → buffer/notify/invalidate)* → dropped`.
pub struct LiveFeed {
    topic: Topic,
    query_keys: Vec<String>,
    state: Arc<Mutex<FeedState>>,
    subscription: DataSubscription,
    _visibility: VisibilityGuard,
}

impl LiveFeed {
    pub fn new(ctx: &RealtimeContext, topic: Topic, options: FeedOptions) -> Self {
        Self::with_hook(ctx, topic, options, |_| {})
    }

    /// Like [`LiveFeed::new`], running `on_event` with the raw payload after
    /// the buffer has been updated. Specialized feeds hang their extra state
    /// off this hook.
    pub fn with_hook(
        ctx: &RealtimeContext,
        topic: Topic,
        options: FeedOptions,
        on_event: impl Fn(&Value) + Send + Sync + 'static,
    ) -> Self {
        let state = Arc::new(Mutex::new(FeedState::new()));
        let notifier = ctx.notifier();
        let formatter = options.formatter.clone();
        let toast = options
            .show_notifications
            .then(|| options.toast.clone())
            .flatten();

        let callback = {
            let state = state.clone();
            move |payload: &Value| {
                let formatted = match &formatter {
                    Some(f) => f(payload),
                    None => payload.clone(),
                };
                {
                    let mut s = lock(&state);
                    s.items.push(formatted);
                    s.count += 1;
                }
                if let Some(make_toast) = &toast {
                    notify_best_effort(notifier.as_ref(), make_toast(payload));
                }
                on_event(payload);
            }
        };

        let subscription = DataSubscription::new(
            ctx,
            SubscriptionOptions::new(topic, options.query_keys.clone()).on_new_data(callback),
        );

        let visibility = {
            let state = state.clone();
            let cache = ctx.cache();
            let keys = options.query_keys.clone();
            ctx.visibility().on_visible(move || {
                lock(&state).reset();
                for key in &keys {
                    cache.invalidate(key);
                }
            })
        };

        Self {
            topic,
            query_keys: options.query_keys,
            state,
            subscription,
            _visibility: visibility,
        }
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    pub fn query_keys(&self) -> &[String] {
        &self.query_keys
    }

    /// Recent payloads, newest first.
    pub fn items(&self) -> Vec<Value> {
        lock(&self.state).items.to_vec()
    }

    pub fn latest(&self) -> Option<Value> {
        lock(&self.state).items.first().cloned()
    }

    pub fn new_count(&self) -> u64 {
        lock(&self.state).count
    }

    /// Buffer and counter read under the same lock.
    pub fn snapshot(&self) -> (Vec<Value>, u64) {
        let s = lock(&self.state);
        (s.items.to_vec(), s.count)
    }

    /// Clears buffer and counter in one step.
    pub fn reset_items(&self) {
        lock(&self.state).reset();
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_connected()
    }
}
