//! Compact JWS tokens carrying the business payload.
//!
//! Requests are signed RS256 with the client key; the certificate subject,
//! issuer, and serial ride along in the header so the server can identify
//! the caller. Response tokens are decoded without signature verification:
//! the server's signature is informational in this protocol, and verifying
//! it would change observable behavior against the live service.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Serialize;
use serde_json::Value;

use crate::core::FiscalError;
use crate::keystore::{KeyStore, SigningMode};

#[derive(Serialize)]
struct JwsHeader<'a> {
    alg: &'static str,
    subject_name: &'a str,
    issuer_name: &'a str,
    serial: &'a str,
}

/// Wrap `payload` as the claim set of a signed compact JWS.
///
/// RS256 is PKCS#1 v1.5 by definition, independent of the padding mode
/// configured for fingerprints.
pub fn sign(payload: &Value, keystore: &dyn KeyStore) -> Result<String, FiscalError> {
    let header = JwsHeader {
        alg: "RS256",
        subject_name: keystore.subject_name(),
        issuer_name: keystore.issuer_name(),
        serial: keystore.serial(),
    };

    let header_b64 = URL_SAFE_NO_PAD
        .encode(serde_json::to_vec(&header).map_err(|e| FiscalError::Token(e.to_string()))?);
    let payload_b64 = URL_SAFE_NO_PAD
        .encode(serde_json::to_vec(payload).map_err(|e| FiscalError::Token(e.to_string()))?);

    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = keystore.sign(signing_input.as_bytes(), SigningMode::Pkcs1v15)?;

    Ok(format!("{signing_input}.{}", URL_SAFE_NO_PAD.encode(signature)))
}

/// Parse the claim set of a compact JWS without verifying its signature.
pub fn decode_unverified(token: &str) -> Result<Value, FiscalError> {
    let mut segments = token.split('.');
    let claims = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_header), Some(claims), Some(_signature), None) => claims,
        _ => {
            return Err(FiscalError::Token(
                "expected three dot-separated segments".into(),
            ))
        }
    };

    let raw = URL_SAFE_NO_PAD
        .decode(claims)
        .map_err(|e| FiscalError::Token(e.to_string()))?;
    serde_json::from_slice(&raw).map_err(|e| FiscalError::Token(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::RsaKeyStore;
    use serde_json::json;

    fn keystore() -> RsaKeyStore {
        let key = rsa::RsaPrivateKey::new(&mut rand::thread_rng(), 2048).unwrap();
        RsaKeyStore::new(key, "CN=test client", "CN=test ca", "42")
    }

    #[test]
    fn sign_then_decode_round_trips_claims() {
        let payload = json!({"InvoiceRequest": {"Invoice": {"TaxNumber": 10039856}}});
        let token = sign(&payload, &keystore()).unwrap();
        assert_eq!(token.split('.').count(), 3);
        assert_eq!(decode_unverified(&token).unwrap(), payload);
    }

    #[test]
    fn header_carries_certificate_attributes() {
        let token = sign(&json!({}), &keystore()).unwrap();
        let header_b64 = token.split('.').next().unwrap();
        let header: Value =
            serde_json::from_slice(&URL_SAFE_NO_PAD.decode(header_b64).unwrap()).unwrap();
        assert_eq!(header["alg"], "RS256");
        assert_eq!(header["subject_name"], "CN=test client");
        assert_eq!(header["serial"], "42");
    }

    #[test]
    fn truncated_token_is_rejected() {
        let err = decode_unverified("only.two").unwrap_err();
        assert!(matches!(err, FiscalError::Token(_)));
    }
}
