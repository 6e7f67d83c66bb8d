//! Client configuration for the real-time layer.

use serde::Deserialize;
use std::env;
use std::time::Duration;
use url::Url;

use crate::error::RealtimeError;

/// Reconnection settings for the shared channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub multiplier: f64,
    /// `None` retries forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 30_000,
            multiplier: 2.0,
            max_retries: None,
        }
    }
}

impl ReconnectPolicy {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    /// e.g. `ws://127.0.0.1:3000/ws/realtime`
    pub ws_url: String,
    /// e.g. `http://127.0.0.1:3000`; seed paths are appended to it.
    pub api_base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub reconnect: ReconnectPolicy,
}

impl RealtimeConfig {
    pub fn new(ws_url: impl Into<String>, api_base_url: impl Into<String>) -> Self {
        Self {
            ws_url: ws_url.into(),
            api_base_url: api_base_url.into(),
            token: None,
            reconnect: ReconnectPolicy::default(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_reconnect(mut self, policy: ReconnectPolicy) -> Self {
        self.reconnect = policy;
        self
    }

    /// Loads `REALTIME_WS_URL`, `REALTIME_API_URL` and the optional
    /// `REALTIME_TOKEN` from `.env` and the environment.
    pub fn from_env() -> Result<Self, RealtimeError> {
        dotenvy::dotenv().ok();

        let ws_url = env::var("REALTIME_WS_URL")
            .map_err(|_| RealtimeError::Config("REALTIME_WS_URL".into()))?;
        let api_base_url = env::var("REALTIME_API_URL")
            .map_err(|_| RealtimeError::Config("REALTIME_API_URL".into()))?;
        let token = env::var("REALTIME_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(Self {
            ws_url,
            api_base_url,
            token,
            reconnect: ReconnectPolicy::default(),
        })
    }

    /// Channel URL with the bearer token carried as `?token=` (browsers and
    /// most WS clients cannot set headers on the upgrade request).
    pub fn channel_url(&self) -> Result<String, RealtimeError> {
        let mut url = Url::parse(&self.ws_url)?;
        if let Some(token) = &self.token {
            url.query_pairs_mut().append_pair("token", token);
        }
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn channel_url_appends_token() {
        let cfg = RealtimeConfig::new("ws://localhost:3000/ws/realtime", "http://localhost:3000")
            .with_token("abc");
        assert_eq!(
            cfg.channel_url().unwrap(),
            "ws://localhost:3000/ws/realtime?token=abc"
        );
    }

    #[test]
    fn channel_url_rejects_garbage() {
        let cfg = RealtimeConfig::new("not a url", "http://localhost:3000");
        assert!(matches!(cfg.channel_url(), Err(RealtimeError::Url(_))));
    }

    #[test]
    fn reconnect_policy_fills_defaults() {
        let policy: ReconnectPolicy = serde_json::from_str(r#"{"max_retries":3}"#).unwrap();
        assert_eq!(policy.max_retries, Some(3));
        assert_eq!(policy.initial_delay(), Duration::from_millis(500));
    }

    #[test]
    #[serial]
    fn from_env_requires_urls() {
        unsafe {
            env::remove_var("REALTIME_WS_URL");
            env::set_var("REALTIME_API_URL", "http://localhost:3000");
        }
        assert!(matches!(
            RealtimeConfig::from_env(),
            Err(RealtimeError::Config(key)) if key == "REALTIME_WS_URL"
        ));

        unsafe {
            env::set_var("REALTIME_WS_URL", "ws://localhost:3000/ws/realtime");
            env::set_var("REALTIME_TOKEN", "");
        }
        let cfg = RealtimeConfig::from_env().unwrap();
        assert_eq!(cfg.token, None);
    }
}
