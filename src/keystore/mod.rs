//! Private-key facade used for fingerprints and transport tokens.
//!
//! Loading and parsing of the certificate container is out of scope; the
//! keystore is constructed from an already-extracted RSA key plus the
//! certificate attributes needed for the JWS header.

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, Pss, RsaPrivateKey};
use sha2::{Digest, Sha256};

use crate::core::FiscalError;

/// RSA padding mode for the invoice fingerprint signature.
///
/// The protocol generations differ here with no negotiation: current
/// deployments expect PSS, earlier ones PKCS#1 v1.5. The mode is explicit
/// configuration because it cannot be inferred from inputs. The transport
/// token is always RS256 (PKCS#1 v1.5) regardless of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningMode {
    #[default]
    Pss,
    Pkcs1v15,
}

/// Signing primitive plus the certificate attributes used for transport
/// token headers. Read-only after construction, so a single instance is
/// safely shared across concurrent submissions.
pub trait KeyStore: Send + Sync {
    /// Sign `data` with SHA-256 and the given padding mode, returning the
    /// raw signature bytes.
    fn sign(&self, data: &[u8], mode: SigningMode) -> Result<Vec<u8>, FiscalError>;

    /// Certificate subject distinguished name.
    fn subject_name(&self) -> &str;

    /// Certificate issuer distinguished name.
    fn issuer_name(&self) -> &str;

    /// Certificate serial number, decimal string form.
    fn serial(&self) -> &str;
}

/// [`KeyStore`] backed by an in-memory RSA private key.
#[derive(Debug)]
pub struct RsaKeyStore {
    key: RsaPrivateKey,
    subject_name: String,
    issuer_name: String,
    serial: String,
}

impl RsaKeyStore {
    pub fn new(
        key: RsaPrivateKey,
        subject_name: impl Into<String>,
        issuer_name: impl Into<String>,
        serial: impl Into<String>,
    ) -> Self {
        Self {
            key,
            subject_name: subject_name.into(),
            issuer_name: issuer_name.into(),
            serial: serial.into(),
        }
    }

    /// Load the private key from a PEM string, accepting both PKCS#8
    /// (`BEGIN PRIVATE KEY`) and PKCS#1 (`BEGIN RSA PRIVATE KEY`) framing.
    ///
    /// Fails with [`FiscalError::SigningUnavailable`] when the PEM holds no
    /// usable RSA key.
    pub fn from_pem(
        pem: &str,
        subject_name: impl Into<String>,
        issuer_name: impl Into<String>,
        serial: impl Into<String>,
    ) -> Result<Self, FiscalError> {
        let key = RsaPrivateKey::from_pkcs8_pem(pem)
            .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
            .map_err(|_| FiscalError::SigningUnavailable)?;
        Ok(Self::new(key, subject_name, issuer_name, serial))
    }
}

impl KeyStore for RsaKeyStore {
    fn sign(&self, data: &[u8], mode: SigningMode) -> Result<Vec<u8>, FiscalError> {
        let digest = Sha256::digest(data);
        match mode {
            SigningMode::Pkcs1v15 => self
                .key
                .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
                .map_err(|e| FiscalError::Signing(e.to_string())),
            SigningMode::Pss => self
                .key
                .sign_with_rng(&mut rand::thread_rng(), Pss::new::<Sha256>(), &digest)
                .map_err(|e| FiscalError::Signing(e.to_string())),
        }
    }

    fn subject_name(&self) -> &str {
        &self.subject_name
    }

    fn issuer_name(&self) -> &str {
        &self.issuer_name
    }

    fn serial(&self) -> &str {
        &self.serial
    }
}
