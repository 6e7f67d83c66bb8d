use serde_json::Value;

use super::deref_to_live_feed;
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::format::field;
use crate::notify::{Toast, ToastKind};
use crate::topic::Topic;

/// Service-request ("demande") updates.
pub struct DemandesFeed {
    inner: LiveFeed,
}

deref_to_live_feed!(DemandesFeed);

impl DemandesFeed {
    pub const QUERY_KEYS: [&'static str; 2] = ["/api/service-requests", "/api/leads"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self::with_options(ctx, true)
    }

    pub fn with_options(ctx: &RealtimeContext, show_notifications: bool) -> Self {
        let options = FeedOptions::new(Self::QUERY_KEYS)
            .with_toast(demande_toast)
            .show_notifications(show_notifications);
        Self {
            inner: LiveFeed::new(ctx, Topic::Demandes, options),
        }
    }

    pub fn new_demandes_count(&self) -> u64 {
        self.inner.new_count()
    }
}

fn demande_toast(payload: &Value) -> Toast {
    let reference = field(payload, &["referenceNumber", "reference"]).unwrap_or("-");
    let message = match field(payload, &["status"]) {
        Some(status) => format!("Réf: {reference} - Statut: {status}"),
        None => format!("Réf: {reference}"),
    };
    Toast::new(ToastKind::Info, "Demande mise à jour", message)
}
