use serde_json::Value;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{deref_to_live_feed, spawn_seed};
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::format::field;
use crate::notify::{Toast, ToastKind};
use crate::seed::ApiClient;
use crate::topic::Topic;
use crate::visibility::VisibilityGuard;

pub const NO_SUBJECT: &str = "Sans objet";
pub const UNKNOWN_SENDER: &str = "Expéditeur inconnu";

/// Incoming emails plus the unread counter shown in the sidebar badge.
///
/// The counter is seeded once from `GET /api/email-unread-count` at mount,
/// bumped on every event and cleared by [`EmailsFeed::mark_all_read`] or
/// when the page becomes visible again. Marking read also tells the server,
/// so the next seed or [`EmailsFeed::refresh_unread`] agrees.
pub struct EmailsFeed {
    inner: LiveFeed,
    unread: Arc<AtomicU64>,
    api: Option<ApiClient>,
    seed: Option<JoinHandle<()>>,
    _visibility: VisibilityGuard,
}

deref_to_live_feed!(EmailsFeed);

impl EmailsFeed {
    pub const QUERY_KEYS: [&'static str; 2] = ["/api/emails", "/api/email-unread-count"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self::with_options(ctx, true)
    }

    pub fn with_options(ctx: &RealtimeContext, show_notifications: bool) -> Self {
        let unread = Arc::new(AtomicU64::new(0));
        let options = FeedOptions::new(Self::QUERY_KEYS)
            .with_toast(email_toast)
            .show_notifications(show_notifications);

        let inner = {
            let unread = unread.clone();
            LiveFeed::with_hook(ctx, Topic::Emails, options, move |_| {
                unread.fetch_add(1, Ordering::SeqCst);
            })
        };

        let visibility = {
            let unread = unread.clone();
            ctx.visibility()
                .on_visible(move || unread.store(0, Ordering::SeqCst))
        };

        let api = ctx.api().cloned();
        let seed = api.clone().and_then(|api| {
            let unread = unread.clone();
            spawn_seed("emails", async move {
                if let Some(count) = api.email_unread_count().await {
                    unread.store(count, Ordering::SeqCst);
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

    pub fn unread_count(&self) -> u64 {
        self.unread.load(Ordering::SeqCst)
    }

    pub fn new_emails_count(&self) -> u64 {
        self.inner.new_count()
    }

    /// Zeroes the counter now and posts the mark-read in the background.
    /// `None` when there is no API client or no runtime to run it on.
    pub fn mark_all_read(&self) -> Option<JoinHandle<()>> {
        self.unread.store(0, Ordering::SeqCst);
        let api = self.api.as_ref()?;
        Handle::try_current().ok().map(|_| api.mark_emails_read())
    }

    /// Re-reads the unread count from the server. Leaves the counter alone
    /// when the fetch fails.
    pub async fn refresh_unread(&self) -> Option<u64> {
        let count = self.api.as_ref()?.email_unread_count().await?;
        self.unread.store(count, Ordering::SeqCst);
        Some(count)
    }
}

impl Drop for EmailsFeed {
    fn drop(&mut self) {
        if let Some(seed) = self.seed.take() {
            seed.abort();
        }
    }
}

fn email_toast(payload: &Value) -> Toast {
    let subject = field(payload, &["subject"]).unwrap_or(NO_SUBJECT);
    let sender = field(payload, &["from", "sender", "fromEmail"]).unwrap_or(UNKNOWN_SENDER);
    Toast::new(ToastKind::Info, "Nouvel email", format!("{subject} - De: {sender}"))
}
