//! One-shot REST calls made by feeds: unread seeds at mount and the
//! fire-and-forget mark-read action.
//!
//! Every failure here is recovered locally and logged; nothing is retried
//! and nothing reaches the user.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tokio::task::JoinHandle;

use crate::config::RealtimeConfig;

pub const EMAIL_UNREAD_COUNT_PATH: &str = "/api/email-unread-count";
pub const UNREAD_NOTIFICATIONS_PATH: &str = "/api/notifications/unread";
pub const MARK_EMAILS_READ_PATH: &str = "/api/emails/mark-read";
pub const MARK_CONTACTS_READ_PATH: &str = "/api/contacts/mark-read";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NotificationItem {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token,
        }
    }

    pub fn from_config(config: &RealtimeConfig) -> Self {
        Self::new(config.api_base_url.clone(), config.token.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// GETs `path` and returns its JSON body.
    ///
    /// `None` on 401 (not authenticated), any other non-OK status, a
    /// non-JSON content type, or a transport failure.
    pub async fn fetch_json(&self, path: &str) -> Option<Value> {
        let response = match self.request(Method::GET, path).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path, error = %e, "seed fetch failed");
                return None;
            }
        };

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "seed fetch skipped: not authenticated");
            return None;
        }
        if !status.is_success() {
            tracing::warn!(path, %status, "seed fetch returned an error status");
            return None;
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            tracing::warn!(path, "seed fetch returned a non-JSON response");
            return None;
        }

        match response.json::<Value>().await {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(path, error = %e, "seed fetch body could not be parsed");
                None
            }
        }
    }

    pub async fn email_unread_count(&self) -> Option<u64> {
        let body = self.fetch_json(EMAIL_UNREAD_COUNT_PATH).await?;
        data_of(&body).get("count").and_then(Value::as_u64)
    }

    pub async fn unread_notifications(&self) -> Option<Vec<NotificationItem>> {
        let body = self.fetch_json(UNREAD_NOTIFICATIONS_PATH).await?;
        let data = data_of(&body);
        let list = data.get("notifications").unwrap_or(data);
        match serde_json::from_value(list.clone()) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!(error = %e, "unread notifications payload has an unexpected shape");
                None
            }
        }
    }

    /// Fire-and-forget `POST /api/notifications/{id}/mark-read`.
    ///
    /// The handle is returned for callers that want to await completion;
    /// dropping it does not cancel the call. Must be called from within a
    /// Tokio runtime.
    pub fn mark_notification_read(&self, id: i64) -> JoinHandle<()> {
        self.post_in_background(format!("/api/notifications/{id}/mark-read"))
    }

    /// Fire-and-forget `POST /api/emails/mark-read`.
    pub fn mark_emails_read(&self) -> JoinHandle<()> {
        self.post_in_background(MARK_EMAILS_READ_PATH.to_string())
    }

    /// Fire-and-forget `POST /api/contacts/mark-read`.
    pub fn mark_contacts_read(&self) -> JoinHandle<()> {
        self.post_in_background(MARK_CONTACTS_READ_PATH.to_string())
    }

    fn post_in_background(&self, path: String) -> JoinHandle<()> {
        let req = self.request(Method::POST, &path);
        tokio::spawn(async move {
            match req.send().await {
                Ok(r) if r.status().is_success() || r.status() == StatusCode::UNAUTHORIZED => {}
                Ok(r) => tracing::warn!(path = %path, status = %r.status(), "mark-read was rejected"),
                Err(e) => tracing::warn!(path = %path, error = %e, "mark-read request failed"),
            }
        })
    }
}

/// The server wraps payloads as `{success, data, message}`; bare bodies are
/// accepted too.
fn data_of(body: &Value) -> &Value {
    body.get("data").unwrap_or(body)
}
