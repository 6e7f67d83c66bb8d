//! Toast notifications fired on event receipt.

use serde::Serialize;
use std::panic::{AssertUnwindSafe, catch_unwind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(kind: ToastKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            kind,
        }
    }
}

/// Displays toasts. Implementations must not block: they run inline with
/// event dispatch.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Notifier for headless use: toasts end up in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        tracing::info!(title = %toast.title, kind = ?toast.kind, "{}", toast.message);
    }
}

/// Best effort: a failing notifier never reaches the dispatch path.
pub(crate) fn notify_best_effort(notifier: &dyn Notifier, toast: Toast) {
    if catch_unwind(AssertUnwindSafe(|| notifier.notify(toast))).is_err() {
        tracing::warn!("toast notifier panicked; notification dropped");
    }
}
