use chrono::{DateTime, Datelike, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{QueryOrder, QuerySelect, TransactionTrait};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A connection request ("demande de raccordement") submitted through the
/// public multi-step form. Each one is also a lead for the back office.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "service_requests")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// `RAC-<year>-<id padded to 4>`
    #[sea_orm(unique)]
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
    pub status: ServiceRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "service_request_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ServiceRequestStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "awaiting_payment")]
    AwaitingPayment,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payment::Entity")]
    Payment,
}

impl Related<super::payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields collected by the public form.
#[derive(Debug, Clone, Default)]
pub struct NewServiceRequest {
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
}

pub fn reference_for(year: i32, id: i64) -> String {
    format!("RAC-{year}-{id:04}")
}

impl Model {
    /// Inserts the request and assigns its reference number from the new id.
    ///
    /// Both writes share one transaction, so a failed reference update
    /// leaves no placeholder row behind.
    pub async fn create(db: &DbConn, input: NewServiceRequest) -> Result<Model, DbErr> {
        let now = Utc::now();
        let txn = db.begin().await?;

        let inserted = ActiveModel {
            reference_number: Set(format!("PENDING-{}", uuid::Uuid::new_v4())),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            postal_code: Set(input.postal_code),
            city: Set(input.city),
            connection_type: Set(input.connection_type),
            power_kva: Set(input.power_kva),
            comments: Set(input.comments),
            status: Set(ServiceRequestStatus::New),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let reference = reference_for(now.year(), inserted.id);
        let mut active: ActiveModel = inserted.into();
        active.reference_number = Set(reference);
        let model = active.update(&txn).await?;

        txn.commit().await?;
        tracing::debug!(id = model.id, reference = %model.reference_number, "service request created");
        Ok(model)
    }

    pub async fn find_by_id(db: &DbConn, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    pub async fn find_by_reference(db: &DbConn, reference: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::ReferenceNumber.eq(reference))
            .one(db)
            .await
    }

    /// Newest first.
    pub async fn list_recent(db: &DbConn, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    pub async fn set_status(
        db: &DbConn,
        id: i64,
        status: ServiceRequestStatus,
    ) -> Result<Model, DbErr> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Service request not found".to_string()))?;

        let mut active: ActiveModel = model.into();
        active.status = Set(status);
        active.updated_at = Set(Utc::now());
        active.update(db).await
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
