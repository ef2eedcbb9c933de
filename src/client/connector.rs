use std::time::Duration;

use serde_json::Value;

use crate::core::FiscalError;
use crate::keystore::SigningMode;

/// Which deployment of the fiscal service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    Test,
    #[default]
    Production,
}

impl Endpoint {
    pub fn base_url(self) -> &'static str {
        match self {
            Endpoint::Test => "https://blagajne-test.fu.gov.si:9002",
            Endpoint::Production => "https://blagajne.fu.gov.si:9003",
        }
    }
}

/// Server paths, relative to the endpoint base URL.
pub const REGISTER_PREMISE_PATH: &str = "v1/cash_registers/invoices/register";
pub const INVOICE_ISSUE_PATH: &str = "v1/cash_registers/invoices";
pub const ECHO_PATH: &str = "v1/cash_registers/echo";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: Endpoint,
    /// Whole-request timeout in seconds. Timed-out requests are surfaced
    /// as [`FiscalError::TransportTimeout`], never retried internally.
    pub timeout_secs: f64,
    /// Outbound HTTP proxy URL, if one is required.
    pub proxy: Option<String>,
    /// Padding mode for the invoice fingerprint signature.
    pub signing_mode: SigningMode,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::Production,
            timeout_secs: 2.0,
            proxy: None,
            signing_mode: SigningMode::default(),
        }
    }
}

/// A raw HTTP exchange result: status code and body text.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One synchronous POST over the mutually-authenticated channel.
///
/// Implementations block until a response arrives or the configured
/// timeout elapses. Non-success statuses are returned as replies, not
/// errors; classification happens in the protocol layer.
pub trait Transport: Send + Sync {
    fn post(&self, path: &str, body: &Value) -> Result<HttpReply, FiscalError>;
}

/// [`Transport`] over HTTPS with client-certificate authentication.
#[derive(Debug)]
pub struct Connector {
    client: reqwest::blocking::Client,
    base_url: &'static str,
}

impl Connector {
    /// Build the connector. `identity_pem` is the concatenated client
    /// certificate and private key in PEM form, used for mutual TLS.
    pub fn new(config: &ClientConfig, identity_pem: Option<&[u8]>) -> Result<Self, FiscalError> {
        let timeout = Duration::try_from_secs_f64(config.timeout_secs)
            .map_err(|e| FiscalError::Config(format!("timeout_secs: {e}")))?;

        let mut builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            // The state CA that signs the fiscal endpoints is not in the
            // webpki root set.
            .danger_accept_invalid_certs(true);

        if let Some(pem) = identity_pem {
            let identity = reqwest::Identity::from_pem(pem)
                .map_err(|e| FiscalError::Config(e.to_string()))?;
            builder = builder.identity(identity);
        }

        if let Some(proxy) = &config.proxy {
            let proxy =
                reqwest::Proxy::all(proxy).map_err(|e| FiscalError::Config(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| FiscalError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.endpoint.base_url(),
        })
    }
}

impl Transport for Connector {
    fn post(&self, path: &str, body: &Value) -> Result<HttpReply, FiscalError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json; charset=UTF-8")
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FiscalError::TransportTimeout
                } else {
                    FiscalError::Connection(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| FiscalError::Connection(e.to_string()))?;

        Ok(HttpReply { status, body })
    }
}
