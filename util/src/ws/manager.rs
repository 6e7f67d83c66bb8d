//! Topic-based broadcast manager.
//!
//! One Tokio broadcast channel per [`Topic`], created on first subscription
//! and pruned once a send finds no receivers. Broadcasting to a topic nobody
//! listens on is a no-op: the event is gone.

use realtime::Topic;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};

type Sender = broadcast::Sender<String>;
type Receiver = broadcast::Receiver<String>;

const CHANNEL_CAPACITY: usize = 100;

#[derive(Clone, Default)]
pub struct WebSocketManager {
    inner: Arc<RwLock<HashMap<Topic, Sender>>>,
}

impl WebSocketManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to `topic`, creating its channel if necessary.
    pub async fn subscribe(&self, topic: Topic) -> Receiver {
        let mut map = self.inner.write().await;
        map.entry(topic)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .subscribe()
    }

    /// Sends `msg` to every current subscriber of `topic`. Returns how many
    /// receivers it reached.
    pub async fn broadcast<T: Into<String>>(&self, topic: Topic, msg: T) -> usize {
        let mut map = self.inner.write().await;
        let Some(sender) = map.get(&topic) else {
            tracing::debug!(%topic, "no subscribers; event dropped");
            return 0;
        };
        let reached = sender.send(msg.into()).unwrap_or(0);
        if sender.receiver_count() == 0 {
            tracing::info!("Removing topic '{topic}' due to no subscribers.");
            map.remove(&topic);
        }
        reached
    }

    pub async fn subscriber_count(&self, topic: Topic) -> usize {
        let map = self.inner.read().await;
        map.get(&topic).map_or(0, |s| s.receiver_count())
    }
}
