//! The `{type, payload}` unit carried over the channel.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RealtimeError;
use crate::topic::Topic;

/// One event as it travels over the channel. Transient: never persisted,
/// never acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub topic: Topic,
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    pub fn new(topic: Topic, payload: Value) -> Self {
        Self { topic, payload }
    }

    /// Serializes the envelope to a text frame.
    pub fn to_frame(&self) -> Result<String, RealtimeError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Decodes a text frame.
///
/// Malformed JSON is an error. Well-formed frames whose `type` is missing or
/// not a known topic (including control frames such as `pong`) decode to
/// `Ok(None)` and are meant to be dropped without a trace.
pub fn decode_frame(raw: &str) -> Result<Option<Envelope>, RealtimeError> {
    let frame: RawFrame = serde_json::from_str(raw)?;
    let Some(kind) = frame.kind else {
        return Ok(None);
    };
    Ok(kind
        .parse::<Topic>()
        .ok()
        .map(|topic| Envelope::new(topic, frame.payload)))
}
