use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::deref_to_live_feed;
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::format::field;
use crate::notify::{Toast, ToastKind};
use crate::seed::ApiClient;
use crate::session::SessionStore;
use crate::topic::Topic;
use crate::visibility::VisibilityGuard;

/// Session key other views read to badge unread contact messages.
pub const CONTACTS_UNREAD_KEY: &str = "contacts_unread_count";

pub struct ContactsFeed {
    inner: LiveFeed,
    unread: Arc<AtomicU64>,
    session: Arc<dyn SessionStore>,
    api: Option<ApiClient>,
    _visibility: VisibilityGuard,
}

deref_to_live_feed!(ContactsFeed);

impl ContactsFeed {
    pub const QUERY_KEYS: [&'static str; 1] = ["/api/contacts"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self::with_options(ctx, true)
    }

    pub fn with_options(ctx: &RealtimeContext, show_notifications: bool) -> Self {
        let unread = Arc::new(AtomicU64::new(0));
        let session = ctx.session();
        let options = FeedOptions::new(Self::QUERY_KEYS)
            .with_toast(|payload| {
                let who = field(payload, &["name", "email"]).unwrap_or("Visiteur");
                let message = match field(payload, &["subject"]) {
                    Some(subject) => format!("{who} - {subject}"),
                    None => who.to_string(),
                };
                Toast::new(ToastKind::Info, "Nouveau message de contact", message)
            })
            .show_notifications(show_notifications);

        let inner = {
            let unread = unread.clone();
            let session = session.clone();
            LiveFeed::with_hook(ctx, Topic::Contacts, options, move |_| {
                let count = unread.fetch_add(1, Ordering::SeqCst) + 1;
                persist(session.as_ref(), count);
            })
        };

        let visibility = {
            let unread = unread.clone();
            let session = session.clone();
            ctx.visibility().on_visible(move || {
                unread.store(0, Ordering::SeqCst);
                persist(session.as_ref(), 0);
            })
        };

        Self {
            inner,
            unread,
            session,
            api: ctx.api().cloned(),
            _visibility: visibility,
        }
    }

    pub fn unread_count(&self) -> u64 {
        self.unread.load(Ordering::SeqCst)
    }

    /// Clears the badge locally and posts the mark-read in the background.
    pub fn mark_all_read(&self) -> Option<JoinHandle<()>> {
        self.unread.store(0, Ordering::SeqCst);
        persist(self.session.as_ref(), 0);
        let api = self.api.as_ref()?;
        Handle::try_current().ok().map(|_| api.mark_contacts_read())
    }
}

/// Best effort; a full or unavailable store only costs the badge.
fn persist(session: &dyn SessionStore, count: u64) {
    if let Err(e) = session.set(CONTACTS_UNREAD_KEY, &count.to_string()) {
        tracing::debug!(error = %e, "could not persist contacts unread count");
    }
}
