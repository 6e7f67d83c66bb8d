use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "contact_messages")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create(
        db: &DbConn,
        name: &str,
        email: &str,
        phone: Option<String>,
        subject: Option<String>,
        message: &str,
    ) -> Result<Model, DbErr> {
        ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            phone: Set(phone),
            subject: Set(subject),
            message: Set(message.to_owned()),
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

    pub async fn count_unread(db: &DbConn) -> Result<u64, DbErr> {
        Entity::find().filter(Column::Read.eq(false)).count(db).await
    }

    pub async fn mark_read(db: &DbConn, id: i64) -> Result<Model, DbErr> {
        let model = Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound("Contact message not found".to_string()))?;

        if model.read {
            return Ok(model);
        }
        let mut active: ActiveModel = model.into();
        active.read = Set(true);
        active.update(db).await
    }

    /// Returns how many messages changed.
    pub async fn mark_all_read(db: &DbConn) -> Result<u64, DbErr> {
        let result = Entity::update_many()
            .col_expr(Column::Read, Expr::value(true))
            .filter(Column::Read.eq(false))
            .exec(db)
            .await?;
        tracing::debug!(rows = result.rows_affected, "contact messages marked read");
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn create_and_count() {
        let db = setup_test_db().await;
        let m = Model::create(&db, "Paul", "paul@exemple.fr", None, Some("Délais".into()), "Bonjour")
            .await
            .unwrap();
        assert!(!m.read);
        assert_eq!(Model::count_unread(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn mark_read_single_and_all() {
        let db = setup_test_db().await;
        let a = Model::create(&db, "Paul", "paul@exemple.fr", None, None, "Un").await.unwrap();
        Model::create(&db, "Anne", "anne@exemple.fr", None, None, "Deux").await.unwrap();

        Model::mark_read(&db, a.id).await.unwrap();
        Model::mark_read(&db, a.id).await.unwrap();
        assert_eq!(Model::count_unread(&db).await.unwrap(), 1);

        assert_eq!(Model::mark_all_read(&db).await.unwrap(), 1);
        assert_eq!(Model::count_unread(&db).await.unwrap(), 0);
    }
}
