pub mod m202601050001_create_service_requests;
pub mod m202601050002_create_payments;
pub mod m202601050003_create_notifications;
pub mod m202601050004_create_emails;
pub mod m202601050005_create_contact_messages;
