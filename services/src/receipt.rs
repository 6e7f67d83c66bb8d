//! Payment receipts ("attestation de paiement") written as static HTML.
//!
//! Each receipt carries an electronic-signature block: a SHA-256 digest over
//! the transaction fields and the generation time, shown as `D0A` followed
//! by the first eight hex digits. It is a local integrity check only; anyone
//! able to regenerate the document can regenerate the digest.

use chrono::{DateTime, Utc};
use db::models::payment::{self, PaymentStatus};
use db::models::service_request;
use realtime::format::{format_eur_cents, mask_card};
use sea_orm::{DatabaseConnection, DbErr};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;
use util::paths::{ensure_dir, receipt_path_in};

pub const SIGNATURE_PREFIX: &str = "D0A";

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("Payment {0} not found")]
    NotFound(i64),

    #[error("Payment {id} is not paid (status: {status})")]
    NotPaid { id: i64, status: PaymentStatus },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Could not write receipt: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not encode signed fields: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The fields covered by the signature, in signing order.
#[derive(Debug, Serialize)]
struct SignedFields<'a> {
    payment_id: i64,
    reference: &'a str,
    amount: i64,
    currency: &'a str,
    card_last4: Option<&'a str>,
    created_at: String,
    generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectronicSignature {
    /// Full lowercase hex SHA-256.
    pub hash: String,
    /// `D0A` + first 8 hex chars, uppercased.
    pub code: String,
}

impl ElectronicSignature {
    fn over(payment: &payment::Model, generated_at: DateTime<Utc>) -> Result<Self, ReceiptError> {
        let fields = SignedFields {
            payment_id: payment.id,
            reference: &payment.reference_number,
            amount: payment.amount_cents,
            currency: &payment.currency,
            card_last4: payment.card_last4.as_deref(),
            created_at: payment.created_at.to_rfc3339(),
            generated_at: generated_at.to_rfc3339(),
        };
        let canonical = serde_json::to_vec(&fields)?;
        let hash = hex::encode(Sha256::digest(&canonical));
        let code = format!("{SIGNATURE_PREFIX}{}", hash[..8].to_uppercase());
        Ok(Self { hash, code })
    }
}

#[derive(Debug, Clone)]
pub struct ReceiptDocument {
    pub payment_id: i64,
    pub path: PathBuf,
    pub html: String,
    pub signature: ElectronicSignature,
    pub generated_at: DateTime<Utc>,
}

pub struct ReceiptService;

impl ReceiptService {
    /// Generates and writes `receipt_<payment_id>.html` under `out_dir`.
    pub async fn generate(
        db: &DatabaseConnection,
        payment_id: i64,
        out_dir: &Path,
    ) -> Result<ReceiptDocument, ReceiptError> {
        Self::generate_at(db, payment_id, out_dir, Utc::now()).await
    }

    /// Same as [`ReceiptService::generate`] with a fixed generation time.
    pub async fn generate_at(
        db: &DatabaseConnection,
        payment_id: i64,
        out_dir: &Path,
        generated_at: DateTime<Utc>,
    ) -> Result<ReceiptDocument, ReceiptError> {
        let payment = payment::Model::find_by_id(db, payment_id)
            .await?
            .ok_or(ReceiptError::NotFound(payment_id))?;

        if !payment.status.is_settled() {
            return Err(ReceiptError::NotPaid {
                id: payment.id,
                status: payment.status,
            });
        }

        let request = payment.service_request(db).await?;
        let signature = ElectronicSignature::over(&payment, generated_at)?;
        let html = render(&payment, request.as_ref(), &signature, generated_at);

        ensure_dir(out_dir)?;
        let path = receipt_path_in(out_dir, payment.id);
        tokio::fs::write(&path, &html).await?;
        tracing::info!(payment_id, path = %path.display(), signature = %signature.code, "receipt generated");

        Ok(ReceiptDocument {
            payment_id,
            path,
            html,
            signature,
            generated_at,
        })
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn french_datetime(at: DateTime<Utc>) -> String {
    at.format("%d/%m/%Y à %H:%M UTC").to_string()
}

fn render(
    payment: &payment::Model,
    request: Option<&service_request::Model>,
    signature: &ElectronicSignature,
    generated_at: DateTime<Utc>,
) -> String {
    let card = payment
        .card_last4
        .as_deref()
        .map(mask_card)
        .unwrap_or_else(|| "Non communiquée".to_string());

    let customer = match request {
        Some(r) => format!(
            r#"<section class="customer">
      <h2>Client</h2>
      <p>{name}</p>
      <p>{address}<br>{postal_code} {city}</p>
      <p>{email}</p>
      <p>Demande : {reference}</p>
    </section>"#,
            name = escape_html(&r.full_name()),
            address = escape_html(&r.address),
            postal_code = escape_html(&r.postal_code),
            city = escape_html(&r.city),
            email = escape_html(&r.email),
            reference = escape_html(&r.reference_number),
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
  <head>
    <meta charset="utf-8">
    <title>Attestation de paiement {reference}</title>
  </head>
  <body>
    <h1>Attestation de paiement</h1>
    <section class="payment">
      <p>Référence : {reference}</p>
      <p>Montant : {amount}</p>
      <p>Carte : {card}</p>
      <p>Date du paiement : {paid_at}</p>
    </section>
    {customer}
    <section class="signature">
      <h2>Signature électronique</h2>
      <p>Code : {code}</p>
      <p>Empreinte SHA-256 : {hash}</p>
      <p>Document généré le {generated}</p>
    </section>
  </body>
</html>
"#,
        reference = escape_html(&payment.reference_number),
        amount = format_eur_cents(payment.amount_cents),
        card = card,
        paid_at = french_datetime(payment.created_at),
        customer = customer,
        code = signature.code,
        hash = signature.hash,
        generated = french_datetime(generated_at),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use db::models::payment::NewPayment;
    use db::test_utils::{sample_service_request, setup_test_db};

    async fn seed_payment(db: &DatabaseConnection, status: PaymentStatus, linked: bool) -> payment::Model {
        let request_id = if linked {
            Some(service_request::Model::create(db, sample_service_request()).await.unwrap().id)
        } else {
            None
        };
        payment::Model::create(
            db,
            NewPayment {
                service_request_id: request_id,
                reference_number: "RAC-2025-0001".into(),
                amount_cents: 12980,
                currency: "EUR".into(),
                card_last4: Some("4242".into()),
                gateway_reference: Some("gw_123".into()),
                status,
            },
        )
        .await
        .unwrap()
    }

    fn fixed() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn writes_signed_receipt() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let p = seed_payment(&db, PaymentStatus::Succeeded, true).await;

        let doc = ReceiptService::generate_at(&db, p.id, dir.path(), fixed()).await.unwrap();

        assert_eq!(doc.path, dir.path().join(format!("receipt_{}.html", p.id)));
        assert_eq!(std::fs::read_to_string(&doc.path).unwrap(), doc.html);
        assert!(doc.html.contains("RAC-2025-0001"));
        assert!(doc.html.contains("129,80\u{a0}€"));
        assert!(doc.html.contains("**** **** **** 4242"));
        assert!(doc.html.contains("Marie Curie"));
        assert!(doc.html.contains("75002 Paris"));

        assert_eq!(doc.signature.hash.len(), 64);
        assert_eq!(doc.signature.code.len(), 11);
        assert!(doc.signature.code.starts_with("D0A"));
        assert_eq!(&doc.signature.code[3..], doc.signature.hash[..8].to_uppercase());
        assert!(doc.html.contains(&doc.signature.code));
    }

    #[tokio::test]
    async fn fixed_generation_time_is_byte_identical() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();
        let p = seed_payment(&db, PaymentStatus::Paid, false).await;

        let a = ReceiptService::generate_at(&db, p.id, dir.path(), fixed()).await.unwrap();
        let b = ReceiptService::generate_at(&db, p.id, dir.path(), fixed()).await.unwrap();
        assert_eq!(a.html, b.html);

        let later = ReceiptService::generate_at(&db, p.id, dir.path(), fixed() + chrono::Duration::seconds(1))
            .await
            .unwrap();
        assert_ne!(later.signature, a.signature);
        assert!(!a.html.contains("Client"));
    }

    #[tokio::test]
    async fn rejects_missing_and_unpaid() {
        let db = setup_test_db().await;
        let dir = tempfile::tempdir().unwrap();

        let missing = ReceiptService::generate(&db, 77, dir.path()).await;
        assert!(matches!(missing, Err(ReceiptError::NotFound(77))));

        let pending = seed_payment(&db, PaymentStatus::Pending, false).await;
        let err = ReceiptService::generate(&db, pending.id, dir.path()).await.unwrap_err();
        assert!(matches!(err, ReceiptError::NotPaid { status: PaymentStatus::Pending, .. }));
        assert!(!dir.path().join(format!("receipt_{}.html", pending.id)).exists());
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<b>"O'Neil" & co</b>"#), "&lt;b&gt;&quot;O&#39;Neil&quot; &amp; co&lt;/b&gt;");
    }
}
