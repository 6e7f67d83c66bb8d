use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Mail exchanged with customers, both directions. Only inbound mail counts
/// toward the unread badge.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "emails")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub direction: EmailDirection,
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
    pub service_request_id: Option<i64>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "email_direction")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmailDirection {
    #[sea_orm(string_value = "inbound")]
    Inbound,
    #[sea_orm(string_value = "outbound")]
    Outbound,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewEmail {
    pub direction: EmailDirection,
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
    pub service_request_id: Option<i64>,
}

impl Model {
    pub async fn create(db: &DbConn, input: NewEmail) -> Result<Model, DbErr> {
        ActiveModel {
            // Our own mail is read by definition.
            read: Set(input.direction == EmailDirection::Outbound),
            direction: Set(input.direction),
            from_address: Set(input.from_address),
            to_address: Set(input.to_address),
            subject: Set(input.subject),
            body: Set(input.body),
            service_request_id: Set(input.service_request_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn list_recent(db: &DbConn, limit: u64) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(db)
            .await
    }

    pub async fn count_unread(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::Direction.eq(EmailDirection::Inbound))
            .filter(Column::Read.eq(false))
            .count(db)
            .await
    }

    /// Marks one mail read. Outbound mail is already read.
    pub async fn mark_read(db: &DbConn, id: i64) -> Result<Model, DbErr> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Email not found".to_string()))?;

        if model.read {
            return Ok(model);
        }
        let mut active: ActiveModel = model.into();
        active.read = Set(true);
        active.update(db).await
    }

    /// Clears the unread badge. Returns how many inbound mails changed.
    pub async fn mark_all_read(db: &DbConn) -> Result<u64, DbErr> {
        let result = Entity::update_many()
            .col_expr(Column::Read, Expr::value(true))
            .filter(Column::Direction.eq(EmailDirection::Inbound))
            .filter(Column::Read.eq(false))
            .exec(db)
            .await?;
        tracing::debug!(rows = result.rows_affected, "inbound mail marked read");
        Ok(result.rows_affected)
    }
}
