#![cfg(feature = "client")]

use std::sync::{Mutex, OnceLock};

use chrono::{TimeZone, Utc};
use fiskal::client::{FiscalClient, HttpReply, Transport};
use fiskal::core::FiscalError;
use fiskal::keystore::{RsaKeyStore, SigningMode};
use fiskal::message::{Header, InvoiceBuilder, InvoiceIdentifier};
use fiskal::token;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn keystore() -> RsaKeyStore {
    static KEY: OnceLock<rsa::RsaPrivateKey> = OnceLock::new();
    let key = KEY
        .get_or_init(|| rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap())
        .clone();
    RsaKeyStore::new(key, "CN=test client", "CN=test ca", "42")
}

/// Transport double: records every POST and plays back a scripted reply.
struct MockTransport {
    requests: Mutex<Vec<(String, Value)>>,
    reply: Box<dyn Fn() -> Result<HttpReply, FiscalError> + Send + Sync>,
}

impl MockTransport {
    fn replying(reply: impl Fn() -> Result<HttpReply, FiscalError> + Send + Sync + 'static) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply: Box::new(reply),
        }
    }

    /// Reply with a signed token whose claims are `claims`.
    fn with_claims(claims: Value) -> Self {
        let token = token::sign(&claims, &keystore()).unwrap();
        Self::replying(move || {
            Ok(HttpReply {
                status: 200,
                body: json!({ "token": token }).to_string(),
            })
        })
    }
}

impl Transport for MockTransport {
    fn post(&self, path: &str, body: &Value) -> Result<HttpReply, FiscalError> {
        self.requests
            .lock()
            .unwrap()
            .push((path.to_string(), body.clone()));
        (self.reply)()
    }
}

fn header() -> Header {
    Header::new(
        "6ba7b810-9dad-11d1-80b4-00c04fd430c8",
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 2, 5).unwrap(),
    )
}

fn invoice() -> fiskal::message::Invoice {
    InvoiceBuilder::new(
        10039856,
        Utc.with_ymd_and_hms(2026, 3, 14, 10, 2, 5).unwrap(),
        InvoiceIdentifier::new("BP101", "B1", "11"),
        dec!(19.15),
        "1f1ad26df9c9c79e27b7e69be2856297",
    )
    .build()
}

#[test]
fn submit_invoice_returns_the_eor() {
    let transport =
        MockTransport::with_claims(json!({"InvoiceResponse": {"UniqueInvoiceID": "9c6-e8b4-11"}}));
    let client = FiscalClient::new(transport, keystore(), SigningMode::Pkcs1v15);

    let eor = client.submit_invoice(invoice(), header()).unwrap();
    assert_eq!(eor, "9c6-e8b4-11");
}

#[test]
fn request_is_a_signed_token_wrapping_the_payload() {
    let transport =
        MockTransport::with_claims(json!({"InvoiceResponse": {"UniqueInvoiceID": "abc"}}));
    let client = FiscalClient::new(transport, keystore(), SigningMode::Pkcs1v15);
    client.submit_invoice(invoice(), header()).unwrap();

    let requests = client.transport_ref().requests.lock().unwrap();
    let (path, body) = &requests[0];
    assert_eq!(path, "v1/cash_registers/invoices");

    // Outer body is exactly {"token": ...}; the claims are the payload.
    let outer = body.as_object().unwrap();
    assert_eq!(outer.len(), 1);
    let claims = token::decode_unverified(outer["token"].as_str().unwrap()).unwrap();
    assert_eq!(claims["InvoiceRequest"]["Invoice"]["TaxNumber"], 10039856);
    assert_eq!(
        claims["InvoiceRequest"]["Header"]["MessageID"],
        "6ba7b810-9dad-11d1-80b4-00c04fd430c8"
    );
}

#[test]
fn embedded_error_node_becomes_protocol_error() {
    let transport = MockTransport::with_claims(json!({
        "InvoiceResponse": {"Error": {"ErrorCode": "E1", "ErrorMessage": "bad cert"}}
    }));
    let client = FiscalClient::new(transport, keystore(), SigningMode::Pkcs1v15);

    match client.submit_invoice(invoice(), header()) {
        Err(FiscalError::Protocol { code, message }) => {
            assert_eq!(code, "E1");
            assert_eq!(message, "bad cert");
        }
        other => panic!("expected protocol error, got {other:?}"),
    }
}

#[test]
fn non_success_status_is_transport_failure() {
    let transport = MockTransport::replying(|| {
        Ok(HttpReply {
            status: 500,
            body: "internal error".into(),
        })
    });
    let client = FiscalClient::new(transport, keystore(), SigningMode::Pkcs1v15);

    match client.submit_invoice(invoice(), header()) {
        Err(FiscalError::TransportFailure { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "internal error");
        }
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[test]
fn timeout_is_surfaced_not_retried() {
    let transport = MockTransport::replying(|| Err(FiscalError::TransportTimeout));
    let client = FiscalClient::new(transport, keystore(), SigningMode::Pkcs1v15);

    assert!(matches!(
        client.submit_invoice(invoice(), header()),
        Err(FiscalError::TransportTimeout)
    ));
    assert_eq!(client.transport_ref().requests.lock().unwrap().len(), 1);
}

#[test]
fn register_premise_succeeds_on_error_free_claims() {
    use fiskal::core::{MovableType, PremiseLocation, SoftwareSupplier};
    use fiskal::message::PremiseRegistrationBuilder;

    let transport = MockTransport::with_claims(json!({"BusinessPremiseResponse": {}}));
    let client = FiscalClient::new(transport, keystore(), SigningMode::Pkcs1v15);

    let premise = PremiseRegistrationBuilder::new(
        10039856,
        "BP101",
        PremiseLocation::movable(MovableType::VehicleOrStand),
        chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        SoftwareSupplier::domestic(24564444),
    )
    .build();

    client.register_premise(premise, header()).unwrap();
    let requests = client.transport_ref().requests.lock().unwrap();
    assert_eq!(requests[0].0, "v1/cash_registers/invoices/register");
}

#[test]
fn echo_collapses_every_failure_to_false() {
    let up = MockTransport::replying(|| {
        Ok(HttpReply {
            status: 200,
            body: "\"EchoResponse\"".into(),
        })
    });
    assert!(FiscalClient::new(up, keystore(), SigningMode::Pkcs1v15).echo());

    let down = MockTransport::replying(|| {
        Ok(HttpReply {
            status: 503,
            body: String::new(),
        })
    });
    assert!(!FiscalClient::new(down, keystore(), SigningMode::Pkcs1v15).echo());

    let timing_out = MockTransport::replying(|| Err(FiscalError::TransportTimeout));
    assert!(!FiscalClient::new(timing_out, keystore(), SigningMode::Pkcs1v15).echo());
}

#[test]
fn echo_request_is_unsigned() {
    let transport = MockTransport::replying(|| {
        Ok(HttpReply {
            status: 200,
            body: String::new(),
        })
    });
    let client = FiscalClient::new(transport, keystore(), SigningMode::Pkcs1v15);
    assert!(client.echo());

    let requests = client.transport_ref().requests.lock().unwrap();
    let (path, body) = &requests[0];
    assert_eq!(path, "v1/cash_registers/echo");
    assert_eq!(body, &json!({"EchoRequest": "ping"}));
}
