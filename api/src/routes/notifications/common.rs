use db::models::notification;
use serde::{Deserialize, Serialize};

/// Shape shared with the realtime `notifications` payload: `id`, `title`,
/// `message`, `kind`, `created_at`.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct NotificationResponse {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: String,
}

impl From<notification::Model> for NotificationResponse {
    fn from(n: notification::Model) -> Self {
        Self {
            id: n.id,
            title: n.title,
            message: n.message,
            kind: n.kind.to_string(),
            read: n.read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UnreadNotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
    pub count: usize,
}
