use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use rust_decimal::Decimal;

use crate::core::{FiscalError, TaxNumber};
use crate::keystore::{KeyStore, SigningMode};

/// Compute the invoice protective mark (ZOI).
///
/// The canonical content string is the concatenation, without separators,
/// of the decimal tax number, the issue timestamp as `DD-MM-YYYY HH:MM:SS`,
/// the invoice number, premise id, device id, and the fixed-point invoice
/// amount. Its UTF-8 bytes are RSA-signed (SHA-256, padding per `mode`),
/// and the raw signature is compressed to 32 lowercase hex characters with
/// MD5.
///
/// MD5 here only folds a variable-length signature into a fixed-width
/// token; integrity rests on the RSA signature step. With
/// [`SigningMode::Pkcs1v15`] the result is fully deterministic for a fixed
/// key and inputs; PSS embeds a random salt, so the mark differs per call
/// while remaining verifiable against the issuer key.
#[allow(clippy::too_many_arguments)]
pub fn calculate_zoi(
    keystore: &dyn KeyStore,
    mode: SigningMode,
    tax_number: TaxNumber,
    issued_at: DateTime<Utc>,
    invoice_number: &str,
    business_premise_id: &str,
    electronic_device_id: &str,
    invoice_amount: Decimal,
) -> Result<String, FiscalError> {
    let content = format!(
        "{}{}{}{}{}{}",
        tax_number,
        issued_at.format("%d-%m-%Y %H:%M:%S"),
        invoice_number,
        business_premise_id,
        electronic_device_id,
        invoice_amount,
    );

    let signature = keystore.sign(content.as_bytes(), mode)?;
    Ok(hex::encode(Md5::digest(&signature)))
}
