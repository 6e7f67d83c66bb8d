use serde_json::Value;

use super::deref_to_live_feed;
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::format::field;
use crate::notify::{Toast, ToastKind};
use crate::topic::Topic;

pub struct LeadsFeed {
    inner: LiveFeed,
}

deref_to_live_feed!(LeadsFeed);

impl LeadsFeed {
    pub const QUERY_KEYS: [&'static str; 2] = ["/api/leads", "/api/dashboard/stats"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self::with_options(ctx, true)
    }

    pub fn with_options(ctx: &RealtimeContext, show_notifications: bool) -> Self {
        let options = FeedOptions::new(Self::QUERY_KEYS)
            .with_toast(lead_toast)
            .show_notifications(show_notifications);
        Self {
            inner: LiveFeed::new(ctx, Topic::Leads, options),
        }
    }

    pub fn new_leads_count(&self) -> u64 {
        self.inner.new_count()
    }
}

fn lead_toast(payload: &Value) -> Toast {
    let name = match (
        field(payload, &["firstName", "prenom"]),
        field(payload, &["lastName", "nom"]),
    ) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(one), None) | (None, Some(one)) => one.to_string(),
        (None, None) => field(payload, &["name", "email"])
            .unwrap_or("Client")
            .to_string(),
    };
    let message = match field(payload, &["referenceNumber", "reference"]) {
        Some(reference) => format!("{name} - Réf: {reference}"),
        None => name,
    };
    Toast::new(ToastKind::Info, "Nouveau lead", message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toast_names_the_customer() {
        let t = lead_toast(&json!({
            "firstName": "Marie",
            "lastName": "Curie",
            "referenceNumber": "RAC-2025-0007"
        }));
        assert_eq!(t.title, "Nouveau lead");
        assert_eq!(t.message, "Marie Curie - Réf: RAC-2025-0007");
    }

    #[test]
    fn toast_falls_back_without_identity() {
        assert_eq!(lead_toast(&json!({})).message, "Client");
        assert_eq!(lead_toast(&json!({ "email": "a@b.fr" })).message, "a@b.fr");
    }

    #[test]
    fn counts_and_invalidates() {
        let ctx = RealtimeContext::builder().build();
        let feed = LeadsFeed::with_options(&ctx, false);
        ctx.dispatch_frame(r#"{"type":"leads","payload":{"id":1}}"#);
        assert_eq!(feed.new_leads_count(), 1);
        assert_eq!(feed.query_keys(), &["/api/leads", "/api/dashboard/stats"]);
    }
}
