use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "notifications")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "notification_kind")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NotificationKind {
    #[sea_orm(string_value = "lead")]
    Lead,
    #[sea_orm(string_value = "payment")]
    Payment,
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "contact")]
    Contact,
    #[sea_orm(string_value = "system")]
    System,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        kind: NotificationKind,
        title: &str,
        message: &str,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            title: Set(title.to_owned()),
            message: Set(message.to_owned()),
            kind: Set(kind),
            read: Set(false),
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

    pub async fn find_unread(db: &DbConn) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Read.eq(false))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(db)
            .await
    }

    pub async fn count_unread(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().filter(Column::Read.eq(false)).count(db).await
    }

    /// Marks one notification read. Marking an already-read one is fine.
    pub async fn mark_read(db: &DbConn, id: i64) -> Result<Model, DbErr> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Notification not found".to_string()))?;

        if model.read {
            return Ok(model);
        }
        let mut active: ActiveModel = model.into();
        active.read = Set(true);
        active.update(db).await
    }
}
