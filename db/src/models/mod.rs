pub mod contact_message;
pub mod email;
pub mod notification;
pub mod payment;
pub mod service_request;

pub use contact_message::Entity as ContactMessage;
pub use email::Entity as Email;
pub use notification::Entity as Notification;
pub use payment::Entity as Payment;
pub use service_request::Entity as ServiceRequest;
