use db::models::payment::{self, PaymentStatus};
use db::models::service_request::{self, ServiceRequestStatus};
use db::models::{contact_message, email, notification};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect,
};
use serde::Serialize;

/// Headline numbers for the back-office dashboard. Also the payload of the
/// `dashboard` topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_leads: u64,
    pub new_leads: u64,
    pub total_payments: u64,
    /// Sum of settled payments, in cents.
    pub paid_amount: i64,
    pub unread_emails: u64,
    pub unread_notifications: u64,
    pub unread_contacts: u64,
}

impl DashboardStats {
    pub async fn compute(db: &DatabaseConnection) -> Result<Self, DbErr> {
        let total_leads = service_request::Entity::find().count(db).await?;
        let new_leads = service_request::Entity::find()
            .filter(service_request::Column::Status.eq(ServiceRequestStatus::New))
            .count(db)
            .await?;
        let total_payments = payment::Entity::find().count(db).await?;

        let paid_amount: Option<i64> = payment::Entity::find()
            .select_only()
            .column_as(payment::Column::AmountCents.sum(), "paid_amount")
            .filter(payment::Column::Status.is_in([PaymentStatus::Succeeded, PaymentStatus::Paid]))
            .into_tuple::<Option<i64>>()
            .one(db)
            .await?
            .flatten();

        Ok(Self {
            total_leads,
            new_leads,
            total_payments,
            paid_amount: paid_amount.unwrap_or(0),
            unread_emails: email::Model::count_unread(db).await?,
            unread_notifications: notification::Model::count_unread(db).await?,
            unread_contacts: contact_message::Model::count_unread(db).await?,
        })
    }
}
