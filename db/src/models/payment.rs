use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Outcome of a hosted card-gateway checkout, as reported back to us.
/// Amounts are in cents.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "payments")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub service_request_id: Option<i64>,
    pub reference_number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub card_last4: Option<String>,
    pub gateway_reference: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "succeeded")]
    Succeeded,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "refunded")]
    Refunded,
}

impl PaymentStatus {
    /// Money has been collected.
    pub fn is_settled(self) -> bool {
        matches!(self, PaymentStatus::Succeeded | PaymentStatus::Paid)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::service_request::Entity",
        from = "Column::ServiceRequestId",
        to = "super::service_request::Column::Id"
    )]
    ServiceRequest,
}

impl Related<super::service_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub service_request_id: Option<i64>,
    pub reference_number: String,
    pub amount_cents: i64,
    pub currency: String,
    pub card_last4: Option<String>,
    pub gateway_reference: Option<String>,
    pub status: PaymentStatus,
}

impl Model {
    pub async fn create(db: &DbConn, input: NewPayment) -> Result<Model, DbErr> {
        let now = Utc::now();

        let active_model = ActiveModel {
            service_request_id: Set(input.service_request_id),
            reference_number: Set(input.reference_number),
            amount_cents: Set(input.amount_cents),
            currency: Set(input.currency),
            card_last4: Set(input.card_last4),
            gateway_reference: Set(input.gateway_reference),
            status: Set(input.status),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        active_model.insert(db).await
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn list_recent(db: &DbConn, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    /// The linked service request, if any.
    pub async fn service_request(
        &self,
        db: &DbConn,
    ) -> Result<Option<super::service_request::Model>, DbErr> {
        match self.service_request_id {
            Some(id) => super::service_request::Entity::find_by_id(id).one(db).await,
            None => Ok(None),
        }
    }
}
