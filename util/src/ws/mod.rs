pub mod manager;
pub mod serve;

pub use manager::WebSocketManager;
pub use serve::{WsServerOptions, serve_channel};

use realtime::{Envelope, Topic};
use serde::Serialize;

/// Broadcasts `payload` on `topic` as a `{type, payload}` envelope.
///
/// Serialization failures are logged and the event dropped; callers never
/// see an error from here.
pub async fn emit<T: Serialize>(ws: &WebSocketManager, topic: Topic, payload: &T) -> usize {
    let frame = serde_json::to_value(payload)
        .map_err(realtime::RealtimeError::from)
        .and_then(|value| Envelope::new(topic, value).to_frame());
    match frame {
        Ok(json) => ws.broadcast(topic, json).await,
        Err(e) => {
            tracing::warn!(%topic, error = %e, "could not serialize event");
            0
        }
    }
}
