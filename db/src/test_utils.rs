use crate::models::service_request::NewServiceRequest;
use migration::Migrator;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory db");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn sample_service_request() -> NewServiceRequest {
    NewServiceRequest {
        first_name: "Marie".into(),
        last_name: "Curie".into(),
        email: "marie@exemple.fr".into(),
        phone: "0601020304".into(),
        address: "1 rue de la Paix".into(),
        postal_code: "75002".into(),
        city: "Paris".into(),
        connection_type: "maison_individuelle".into(),
        power_kva: Some(12),
        comments: None,
    }
}
