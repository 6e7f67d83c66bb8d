use serde_json::Value;
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{deref_to_live_feed, spawn_seed};
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::format::field;
use crate::lock;
use crate::notify::{Toast, ToastKind};
use crate::seed::{ApiClient, NotificationItem};
use crate::topic::Topic;
use crate::visibility::VisibilityGuard;

/// Admin notifications with a locally maintained unread list.
pub struct NotificationsFeed {
    inner: LiveFeed,
    unread: Arc<Mutex<Vec<NotificationItem>>>,
    api: Option<ApiClient>,
    seed: Option<JoinHandle<()>>,
    _visibility: VisibilityGuard,
}

deref_to_live_feed!(NotificationsFeed);

impl NotificationsFeed {
    pub const QUERY_KEYS: [&'static str; 2] = ["/api/notifications", "/api/notifications/unread"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self::with_options(ctx, true)
    }

    pub fn with_options(ctx: &RealtimeContext, show_notifications: bool) -> Self {
        let unread: Arc<Mutex<Vec<NotificationItem>>> = Arc::default();
        let options = FeedOptions::new(Self::QUERY_KEYS)
            .with_toast(|payload| {
                let title = field(payload, &["title"]).unwrap_or("Nouvelle notification");
                let message = field(payload, &["message"]).unwrap_or_default();
                Toast::new(ToastKind::Info, format!("Nouvelle notification: {title}"), message)
            })
            .show_notifications(show_notifications);

        let inner = {
            let unread = unread.clone();
            LiveFeed::with_hook(ctx, Topic::Notifications, options, move |payload| {
                if let Some(item) = as_item(payload) {
                    let mut list = lock(&unread);
                    if !list.iter().any(|n| n.id == item.id) {
                        list.insert(0, item);
                    }
                }
            })
        };

        let visibility = {
            let unread = unread.clone();
            ctx.visibility().on_visible(move || lock(&unread).clear())
        };

        let api = ctx.api().cloned();
        let seed = api.clone().and_then(|api| {
            let unread = unread.clone();
            spawn_seed("notifications", async move {
                if let Some(items) = api.unread_notifications().await {
                    merge_seed(&mut lock(&unread), items);
                }
            })
        });

        Self {
            inner,
            unread,
            api,
            seed,
            _visibility: visibility,
        }
    }

    pub fn unread(&self) -> Vec<NotificationItem> {
        lock(&self.unread).clone()
    }

    pub fn unread_count(&self) -> usize {
        lock(&self.unread).len()
    }

    /// Drops `id` from the unread list right away and tells the server in
    /// the background. The server call is not awaited and its failure is
    /// only logged; the local removal stands either way.
    pub fn mark_read(&self, id: i64) -> Option<JoinHandle<()>> {
        lock(&self.unread).retain(|n| n.id != id);
        let api = self.api.as_ref()?;
        Handle::try_current()
            .ok()
            .map(|_| api.mark_notification_read(id))
    }

    pub async fn refresh_unread(&self) -> Option<usize> {
        let items = self.api.as_ref()?.unread_notifications().await?;
        let mut list = lock(&self.unread);
        merge_seed(&mut list, items);
        Some(list.len())
    }
}

impl Drop for NotificationsFeed {
    fn drop(&mut self) {
        if let Some(seed) = self.seed.take() {
            seed.abort();
        }
    }
}

/// Live items the server did not list yet come first, then the server's
/// list in its own order.
fn merge_seed(list: &mut Vec<NotificationItem>, seeded: Vec<NotificationItem>) {
    let live: Vec<NotificationItem> = list
        .drain(..)
        .filter(|n| !seeded.iter().any(|s| s.id == n.id))
        .collect();
    list.extend(live);
    list.extend(seeded);
}

fn as_item(payload: &Value) -> Option<NotificationItem> {
    serde_json::from_value(payload.clone()).ok()
}
