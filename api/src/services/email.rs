//! Outgoing mail over SMTP with `lettre`.
//!
//! The transport is built once from `SMTP_HOST`, `SMTP_PORT`,
//! `SMTP_USERNAME` and `SMTP_PASSWORD`. When no host is configured every
//! send fails with [`EmailError::NotConfigured`]; callers on best-effort
//! paths log that and move on.

use db::models::service_request;
use lettre::{
    AsyncTransport, Tokio1Executor,
    message::{Mailbox, Message, MultiPart, SinglePart, header},
    transport::smtp::{AsyncSmtpTransport, authentication::Credentials},
};
use once_cell::sync::Lazy;
use realtime::format::format_eur_cents;
use thiserror::Error;
use util::config;

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Email delivery is not configured")]
    NotConfigured,

    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Could not build message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

static SMTP_CLIENT: Lazy<Option<AsyncSmtpTransport<Tokio1Executor>>> = Lazy::new(|| {
    let host = config::smtp_host();
    if host.is_empty() {
        tracing::info!("SMTP_HOST is not set; outgoing email is disabled");
        return None;
    }

    let builder = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host) {
        Ok(b) => b.port(config::smtp_port()),
        Err(e) => {
            tracing::error!(host, error = %e, "could not create SMTP transport");
            return None;
        }
    };

    let username = config::smtp_username();
    let builder = if username.is_empty() {
        builder
    } else {
        builder.credentials(Credentials::new(username, config::smtp_password()))
    };

    Some(builder.build())
});

pub struct EmailService;

impl EmailService {
    pub fn is_configured() -> bool {
        SMTP_CLIENT.is_some()
    }

    fn sender() -> Result<Mailbox, EmailError> {
        let address = config::smtp_username();
        if address.is_empty() {
            return Err(EmailError::NotConfigured);
        }
        Ok(format!("{} <{}>", config::email_from_name(), address).parse()?)
    }

    async fn deliver(message: Message) -> Result<(), EmailError> {
        let client = SMTP_CLIENT.as_ref().ok_or(EmailError::NotConfigured)?;
        client.send(message).await?;
        Ok(())
    }

    /// Sends a plain-text message composed in the back office.
    pub async fn send_plain(to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        if !Self::is_configured() {
            return Err(EmailError::NotConfigured);
        }
        let message = Message::builder()
            .from(Self::sender()?)
            .to(to.parse()?)
            .subject(subject)
            .header(header::ContentType::TEXT_PLAIN)
            .body(body.to_owned())?;
        Self::deliver(message).await
    }

    /// Tells the back-office inbox about a freshly submitted request.
    pub async fn send_lead_alert(lead: &service_request::Model) -> Result<(), EmailError> {
        let to = config::admin_notification_email();
        if to.is_empty() || !Self::is_configured() {
            return Err(EmailError::NotConfigured);
        }

        let text = format!(
            "Nouvelle demande de raccordement\n\n\
             Référence : {}\n\
             Client : {}\n\
             Email : {}\n\
             Téléphone : {}\n\
             Adresse : {}, {} {}\n\
             Type : {}",
            lead.reference_number,
            lead.full_name(),
            lead.email,
            lead.phone,
            lead.address,
            lead.postal_code,
            lead.city,
            lead.connection_type,
        );
        let html = format!(
            "<h2>Nouvelle demande de raccordement</h2>\
             <p>Référence : <strong>{}</strong></p>\
             <p>{} ({})</p>",
            lead.reference_number,
            lead.full_name(),
            lead.email,
        );

        let message = Message::builder()
            .from(Self::sender()?)
            .to(to.parse()?)
            .subject(format!("Nouvelle demande {}", lead.reference_number))
            .multipart(alternative(text, html))?;
        Self::deliver(message).await
    }

    /// Confirms a settled payment to the customer.
    pub async fn send_payment_confirmation(
        to: &str,
        reference: &str,
        amount_cents: i64,
    ) -> Result<(), EmailError> {
        if !Self::is_configured() {
            return Err(EmailError::NotConfigured);
        }
        let amount = format_eur_cents(amount_cents);

        let text = format!(
            "Bonjour,\n\n\
             Nous confirmons la réception de votre paiement de {amount} pour la demande {reference}.\n\n\
             {}",
            config::email_from_name()
        );
        let html = format!(
            "<p>Bonjour,</p>\
             <p>Nous confirmons la réception de votre paiement de <strong>{amount}</strong> \
             pour la demande <strong>{reference}</strong>.</p>\
             <p>{}</p>",
            config::email_from_name()
        );

        let message = Message::builder()
            .from(Self::sender()?)
            .to(to.parse()?)
            .subject(format!("Confirmation de paiement {reference}"))
            .multipart(alternative(text, html))?;
        Self::deliver(message).await
    }
}

fn alternative(text: String, html: String) -> MultiPart {
    MultiPart::alternative()
        .singlepart(
            SinglePart::builder()
                .header(header::ContentType::TEXT_PLAIN)
                .body(text),
        )
        .singlepart(
            SinglePart::builder()
                .header(header::ContentType::TEXT_HTML)
                .body(html),
        )
}
