use db::models::service_request;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestResponse {
    pub id: i64,
    pub reference_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub postal_code: String,
    pub city: String,
    pub connection_type: String,
    pub power_kva: Option<i32>,
    pub comments: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<service_request::Model> for ServiceRequestResponse {
    fn from(m: service_request::Model) -> Self {
        Self {
            id: m.id,
            reference_number: m.reference_number,
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone: m.phone,
            address: m.address,
            postal_code: m.postal_code,
            city: m.city,
            connection_type: m.connection_type,
            power_kva: m.power_kva,
            comments: m.comments,
            status: m.status.to_string(),
            created_at: m.created_at.to_rfc3339(),
            updated_at: m.updated_at.to_rfc3339(),
        }
    }
}
