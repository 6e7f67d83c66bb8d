use db::models::email;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EmailResponse {
    pub id: i64,
    pub direction: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub service_request_id: Option<i64>,
    pub read: bool,
    pub created_at: String,
}

impl From<email::Model> for EmailResponse {
    fn from(m: email::Model) -> Self {
        Self {
            id: m.id,
            direction: m.direction.to_string(),
            from: m.from_address,
            to: m.to_address,
            subject: m.subject,
            body: m.body,
            service_request_id: m.service_request_id,
            read: m.read,
            created_at: m.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UnreadCountResponse {
    pub count: u64,
}
