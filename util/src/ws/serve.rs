//! Server side of the shared real-time channel.
//!
//! A client opens one socket and receives every topic over it: one pump task
//! per topic forwards that topic's broadcasts into a single outbound queue
//! drained by a writer task.

use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use realtime::Topic;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use super::WebSocketManager;

pub struct WsServerOptions {
    pub ws_ping_sec: u64,
    pub enable_app_ping: bool,
    pub topics: Vec<Topic>,
}

impl Default for WsServerOptions {
    fn default() -> Self {
        Self {
            ws_ping_sec: 30,
            enable_app_ping: true,
            topics: Topic::ALL.to_vec(),
        }
    }
}

pub async fn serve_channel(
    socket: WebSocket,
    manager: WebSocketManager,
    opts: WsServerOptions,
) {
    let (mut sink, mut socket_rx) = socket.split();

    let (out_tx, mut out_rx) = mpsc::channel::<Message>(256);
    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            if sink.send(frame).await.is_err() {
                break;
            }
        }
    });

    let mut pumps: Vec<JoinHandle<()>> = Vec::with_capacity(opts.topics.len());
    for &topic in &opts.topics {
        let rx = manager.subscribe(topic).await;
        pumps.push(tokio::spawn(pump(topic, rx, out_tx.clone())));
    }

    let ping = {
        let out_tx = out_tx.clone();
        let every = Duration::from_secs(opts.ws_ping_sec.max(1));
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(every).await;
                if out_tx.send(Message::Ping(Bytes::new())).await.is_err() {
                    break;
                }
            }
        })
    };

    while let Some(Ok(msg)) = socket_rx.next().await {
        match msg {
            Message::Text(text) => {
                if opts.enable_app_ping && is_app_ping(text.as_str()) {
                    let pong = serde_json::json!({ "type": "pong" }).to_string();
                    let _ = out_tx.send(Message::Text(pong.into())).await;
                }
                // Clients have nothing else to say on this channel.
            }
            Message::Ping(payload) => {
                let _ = out_tx.send(Message::Pong(payload)).await;
            }
            Message::Close(_) => break,
            Message::Pong(_) | Message::Binary(_) => {}
        }
    }

    ping.abort();
    for p in pumps {
        p.abort();
    }
    drop(out_tx);
    let _ = writer.await;
    tracing::debug!("realtime socket closed");
}

async fn pump(topic: Topic, mut rx: broadcast::Receiver<String>, out_tx: mpsc::Sender<Message>) {
    loop {
        match rx.recv().await {
            Ok(text) => {
                if out_tx.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            // Slow consumer: skipped events are lost, keep going.
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(%topic, skipped = n, "realtime client lagging");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn is_app_ping(raw: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(raw),
        Ok(Value::Object(map)) if map.get("type").and_then(Value::as_str) == Some("ping")
    )
}
