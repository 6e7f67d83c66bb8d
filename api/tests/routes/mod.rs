mod auth_test;
mod contacts_test;
mod dashboard_test;
mod emails_test;
mod health_test;
mod leads_test;
mod notifications_test;
mod payments_test;
mod service_requests_test;
