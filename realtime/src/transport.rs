//! The single shared channel to the server.
//!
//! Delivery is at-most-once: frames produced while the channel is down are
//! gone for good, and nothing is replayed after a reconnect.

use futures_util::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::{RealtimeConfig, ReconnectPolicy};
use crate::context::RealtimeContext;
use crate::error::RealtimeError;
use crate::lock;

/// Shared `isConnected` flag. Every subscription reads the same one.
#[derive(Clone, Debug)]
pub struct ConnectionState {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ConnectionState {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    /// Updates the flag; returns whether it changed.
    pub fn set(&self, connected: bool) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// What the rest of the layer needs from a transport.
pub trait ChannelTransport: Send + Sync {
    /// Idempotent: a second call while the channel is up (or retrying) is a
    /// no-op.
    fn connect(&self);
    fn is_connected(&self) -> bool;
}

/// Exponential backoff between reconnection attempts.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: ReconnectPolicy,
    attempt: u32,
    current: Duration,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        let current = policy.initial_delay();
        Self {
            policy,
            attempt: 0,
            current,
        }
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Delay before the next attempt, or `None` once retries are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.policy.max_retries.is_some_and(|max| self.attempt >= max) {
            return None;
        }
        self.attempt += 1;
        let delay = self.current;
        let next_ms = (self.current.as_millis() as f64 * self.policy.multiplier) as u64;
        self.current = Duration::from_millis(next_ms).min(self.policy.max_delay());
        Some(delay)
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
        self.current = self.policy.initial_delay();
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PumpExit {
    Lost,
    Shutdown,
}

/// WebSocket-backed channel. One per application session, owned by the top
/// level; subscriptions only ever read its state.
pub struct WsChannel {
    url: String,
    policy: ReconnectPolicy,
    ctx: RealtimeContext,
    started: AtomicBool,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl WsChannel {
    pub fn new(config: &RealtimeConfig, ctx: RealtimeContext) -> Result<Self, RealtimeError> {
        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            url: config.channel_url()?,
            policy: config.reconnect.clone(),
            ctx,
            started: AtomicBool::new(false),
            shutdown,
            task: Mutex::new(None),
        })
    }

    /// Stops the connection task and waits for it to wind down.
    pub async fn shutdown(&self) {
        self.shutdown.send_replace(true);
        let task = lock(&self.task).take();
        if let Some(task) = task {
            let _ = task.await;
        }
        self.ctx.set_connected(false);
    }
}

impl ChannelTransport for WsChannel {
    /// Must be called from within a Tokio runtime.
    fn connect(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        let task = tokio::spawn(run_channel(
            self.url.clone(),
            self.ctx.clone(),
            Backoff::new(self.policy.clone()),
            self.shutdown.subscribe(),
        ));
        *lock(&self.task) = Some(task);
    }

    fn is_connected(&self) -> bool {
        self.ctx.is_connected()
    }
}

impl Drop for WsChannel {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn run_channel(
    url: String,
    ctx: RealtimeContext,
    mut backoff: Backoff,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        if *shutdown.borrow() {
            break;
        }

        match connect_async(url.as_str()).await {
            Ok((stream, _)) => {
                backoff.reset();
                ctx.set_connected(true);
                tracing::info!("realtime channel connected");

                let exit = pump(stream, &ctx, &mut shutdown).await;
                ctx.set_connected(false);
                if exit == PumpExit::Shutdown {
                    break;
                }
                tracing::warn!("realtime channel lost");
            }
            Err(e) => {
                ctx.set_connected(false);
                tracing::warn!(error = %e, attempt = backoff.attempt(), "realtime channel connect failed");
            }
        }

        let Some(delay) = backoff.next_delay() else {
            tracing::error!("realtime channel giving up after {} attempts", backoff.attempt());
            break;
        };
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.changed() => break,
        }
    }
    ctx.set_connected(false);
    tracing::info!("realtime channel stopped");
}

async fn pump<S>(
    stream: tokio_tungstenite::WebSocketStream<S>,
    ctx: &RealtimeContext,
    shutdown: &mut watch::Receiver<bool>,
) -> PumpExit
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    let (mut sink, mut rx) = stream.split();
    loop {
        tokio::select! {
            _ = shutdown.changed() => {
                let _ = sink.send(Message::Close(None)).await;
                return PumpExit::Shutdown;
            }
            frame = rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    ctx.dispatch_frame(text.as_str());
                }
                Some(Ok(Message::Ping(payload))) => {
                    if sink.send(Message::Pong(payload)).await.is_err() {
                        return PumpExit::Lost;
                    }
                }
                Some(Ok(Message::Close(_))) | None => return PumpExit::Lost,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "realtime channel read error");
                    return PumpExit::Lost;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_retries: Option<u32>) -> ReconnectPolicy {
        ReconnectPolicy {
            initial_delay_ms: 100,
            max_delay_ms: 350,
            multiplier: 2.0,
            max_retries,
        }
    }

    #[test]
    fn backoff_grows_and_caps() {
        let mut b = Backoff::new(policy(None));
        assert_eq!(b.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(b.next_delay(), Some(Duration::from_millis(200)));
        assert_eq!(b.next_delay(), Some(Duration::from_millis(350)));
        assert_eq!(b.next_delay(), Some(Duration::from_millis(350)));
        b.reset();
        assert_eq!(b.attempt(), 0);
        assert_eq!(b.next_delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn backoff_respects_max_retries() {
        let mut b = Backoff::new(policy(Some(2)));
        assert!(b.next_delay().is_some());
        assert!(b.next_delay().is_some());
        assert_eq!(b.next_delay(), None);
    }

    #[test]
    fn connection_state_reports_changes_only() {
        let state = ConnectionState::new();
        let rx = state.subscribe();
        assert!(!state.is_connected());
        assert!(state.set(true));
        assert!(!state.set(true));
        assert!(*rx.borrow());
        assert!(state.set(false));
    }

    #[tokio::test]
    async fn connect_is_idempotent_and_failures_stay_disconnected() {
        let ctx = RealtimeContext::builder().build();
        // Nothing listens on port 9; every attempt fails fast.
        let cfg = RealtimeConfig::new("ws://127.0.0.1:9/ws/realtime", "http://127.0.0.1:9")
            .with_reconnect(ReconnectPolicy {
                initial_delay_ms: 10,
                max_delay_ms: 10,
                multiplier: 1.0,
                max_retries: Some(1),
            });
        let channel = WsChannel::new(&cfg, ctx.clone()).unwrap();
        channel.connect();
        channel.connect();
        assert!(lock(&channel.task).is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!channel.is_connected());
        channel.shutdown().await;
    }
}
