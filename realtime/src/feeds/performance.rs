use serde_json::Value;

use super::deref_to_live_feed;
use crate::context::RealtimeContext;
use crate::feed::{FeedOptions, LiveFeed};
use crate::topic::Topic;

/// Server performance samples, broadcast periodically. No toast.
pub struct PerformanceFeed {
    inner: LiveFeed,
}

deref_to_live_feed!(PerformanceFeed);

impl PerformanceFeed {
    pub const QUERY_KEYS: [&'static str; 1] = ["/api/performance"];

    pub fn new(ctx: &RealtimeContext) -> Self {
        Self {
            inner: LiveFeed::new(ctx, Topic::Performance, FeedOptions::new(Self::QUERY_KEYS)),
        }
    }

    /// Most recent sample, if any arrived since mount or the last reset.
    pub fn current(&self) -> Option<Value> {
        self.inner.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn current_is_the_newest_sample() {
        let ctx = RealtimeContext::builder().build();
        let feed = PerformanceFeed::new(&ctx);
        assert_eq!(feed.current(), None);
        ctx.dispatch_frame(r#"{"type":"performance","payload":{"cpu":10.0}}"#);
        ctx.dispatch_frame(r#"{"type":"performance","payload":{"cpu":12.5}}"#);
        assert_eq!(feed.current(), Some(json!({ "cpu": 12.5 })));
    }
}
