use super::deref_to_live_feed;
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::topic::Topic;

/// Dashboard statistics snapshots. No toast.
pub struct DashboardFeed {
    inner: LiveFeed,
}

deref_to_live_feed!(DashboardFeed);

impl DashboardFeed {
    pub const QUERY_KEYS: [&'static str; 1] = ["/api/dashboard/stats"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self {
            inner: LiveFeed::new(ctx, Topic::Dashboard, FeedOptions::new(Self::QUERY_KEYS)),
        }
    }
}
