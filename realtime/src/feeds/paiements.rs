use serde_json::Value;

use super::deref_to_live_feed;
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::format::{cents_from_value, field, format_eur_cents};
use crate::notify::{Toast, ToastKind};
use crate::topic::Topic;

pub struct PaiementsFeed {
    inner: LiveFeed,
}

deref_to_live_feed!(PaiementsFeed);

impl PaiementsFeed {
    pub const QUERY_KEYS: [&'static str; 2] = ["/api/payments", "/api/dashboard/stats"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self::with_options(ctx, true)
    }

    pub fn with_options(ctx: &RealtimeContext, show_notifications: bool) -> Self {
        let options = FeedOptions::new(Self::QUERY_KEYS)
            .with_toast(payment_toast)
            .show_notifications(show_notifications);
        Self {
            inner: LiveFeed::new(ctx, Topic::Paiements, options),
        }
    }

    pub fn new_paiements_count(&self) -> u64 {
        self.inner.new_count()
    }
}

/// `"Réf: <reference> - Montant: <amount>"`, amount given in cents.
pub(crate) fn payment_message(payload: &Value) -> String {
    let reference = field(payload, &["referenceNumber", "reference"]).unwrap_or("-");
    let amount = payload
        .get("amount")
        .and_then(cents_from_value)
        .map(format_eur_cents)
        .unwrap_or_else(|| "-".to_string());
    format!("Réf: {reference} - Montant: {amount}")
}

fn payment_toast(payload: &Value) -> Toast {
    Toast::new(ToastKind::Success, "Nouveau paiement reçu", payment_message(payload))
}
