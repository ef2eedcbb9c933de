//! High-level client: sign, transmit, decode, classify.
//!
//! Every submission is one synchronous exchange. Requests are independent
//! and stateless; the only shared resource is the keystore, which is
//! read-only, so one client may serve many threads.

mod connector;

pub use connector::*;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::{FiscalError, TaxNumber};
use crate::fingerprint::{self, RECEIPT_TZ};
use crate::keystore::{KeyStore, SigningMode};
use crate::message::{BusinessPremise, Header, Invoice, SalesBookInvoice};
use crate::token;

/// Client for the fiscal cash-register service.
pub struct FiscalClient<T: Transport, K: KeyStore> {
    transport: T,
    keystore: K,
    signing_mode: SigningMode,
    receipt_tz: Tz,
}

impl<K: KeyStore> FiscalClient<Connector, K> {
    /// Connect over HTTPS with the given configuration and optional
    /// client identity (PEM certificate + key) for mutual TLS.
    pub fn connect(
        keystore: K,
        config: &ClientConfig,
        identity_pem: Option<&[u8]>,
    ) -> Result<Self, FiscalError> {
        let transport = Connector::new(config, identity_pem)?;
        Ok(Self::new(transport, keystore, config.signing_mode))
    }
}

impl<T: Transport, K: KeyStore> FiscalClient<T, K> {
    pub fn new(transport: T, keystore: K, signing_mode: SigningMode) -> Self {
        Self {
            transport,
            keystore,
            signing_mode,
            receipt_tz: RECEIPT_TZ,
        }
    }

    /// Override the timezone printed on receipts.
    pub fn receipt_tz(mut self, tz: Tz) -> Self {
        self.receipt_tz = tz;
        self
    }

    /// The underlying transport, e.g. for inspection in tests.
    pub fn transport_ref(&self) -> &T {
        &self.transport
    }

    /// Register or close a business premise. Success carries no data
    /// beyond the absence of an error node.
    pub fn register_premise(
        &self,
        premise: BusinessPremise,
        header: Header,
    ) -> Result<(), FiscalError> {
        let payload = premise.into_request(header)?;
        self.send(REGISTER_PREMISE_PATH, &payload).map(|_| ())
    }

    /// Submit an invoice and return its unique registration code (EOR).
    pub fn submit_invoice(&self, invoice: Invoice, header: Header) -> Result<String, FiscalError> {
        let payload = invoice.into_request(header)?;
        let claims = self.send(INVOICE_ISSUE_PATH, &payload)?;
        extract_eor(&claims)
    }

    /// Submit a sales-book invoice and return its registration code (EOR).
    pub fn submit_sales_book_invoice(
        &self,
        invoice: SalesBookInvoice,
        header: Header,
    ) -> Result<String, FiscalError> {
        let payload = invoice.into_request(header)?;
        let claims = self.send(INVOICE_ISSUE_PATH, &payload)?;
        extract_eor(&claims)
    }

    /// Compute the invoice protective mark with this client's key and
    /// configured padding mode.
    pub fn calculate_zoi(
        &self,
        tax_number: TaxNumber,
        issued_at: DateTime<Utc>,
        invoice_number: &str,
        business_premise_id: &str,
        electronic_device_id: &str,
        invoice_amount: Decimal,
    ) -> Result<String, FiscalError> {
        fingerprint::calculate_zoi(
            &self.keystore,
            self.signing_mode,
            tax_number,
            issued_at,
            invoice_number,
            business_premise_id,
            electronic_device_id,
            invoice_amount,
        )
    }

    /// Render the printable receipt code for a computed ZOI.
    pub fn printable_code(
        &self,
        tax_number: TaxNumber,
        zoi: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, FiscalError> {
        fingerprint::printable_code(tax_number, zoi, issued_at, self.receipt_tz)
    }

    /// Liveness probe. Posts an unsigned ping and reports reachability;
    /// every failure mode collapses to `false`, nothing is raised.
    pub fn echo(&self) -> bool {
        let mut ping = serde_json::Map::new();
        ping.insert("EchoRequest".to_string(), Value::String("ping".to_string()));

        matches!(
            self.transport.post(ECHO_PATH, &Value::Object(ping)),
            Ok(reply) if reply.is_success()
        )
    }

    /// Build → Sign → Transmit → Await → Decode → Classify.
    fn send(&self, path: &str, payload: &Value) -> Result<Value, FiscalError> {
        let token = token::sign(payload, &self.keystore)?;

        let mut body = serde_json::Map::new();
        body.insert("token".to_string(), Value::String(token));

        debug!(path, "posting fiscal request");
        let reply = self.transport.post(path, &Value::Object(body))?;

        if !reply.is_success() {
            warn!(status = reply.status, "fiscal request rejected");
            return Err(FiscalError::TransportFailure {
                status: reply.status,
                body: reply.body,
            });
        }

        let outer: Value = serde_json::from_str(&reply.body)
            .map_err(|e| FiscalError::MalformedResponse(e.to_string()))?;
        let response_token = outer
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| FiscalError::MalformedResponse("missing token field".into()))?;

        // The response signature is informational; claims are read
        // unverified on purpose.
        let claims = token::decode_unverified(response_token)?;
        classify(claims)
    }
}

/// Fail when the decoded claim set's top-level object embeds an error
/// node; pass the claims through otherwise.
fn classify(claims: Value) -> Result<Value, FiscalError> {
    let error = claims
        .as_object()
        .and_then(|obj| obj.values().next())
        .and_then(|response| response.get("Error"));

    if let Some(error) = error {
        let code = error
            .get("ErrorCode")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let message = error
            .get("ErrorMessage")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        warn!(code = %code, "fiscal server returned an error");
        return Err(FiscalError::Protocol { code, message });
    }

    Ok(claims)
}

fn extract_eor(claims: &Value) -> Result<String, FiscalError> {
    claims
        .get("InvoiceResponse")
        .and_then(|r| r.get("UniqueInvoiceID"))
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| {
            FiscalError::MalformedResponse("missing InvoiceResponse.UniqueInvoiceID".into())
        })
}
