use thiserror::Error;

/// Errors surfaced by fingerprinting, message assembly, and the transport
/// protocol.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FiscalError {
    /// No usable private key is loaded; signing cannot proceed.
    #[error("no usable private key loaded for signing")]
    SigningUnavailable,

    /// The signing primitive itself failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The fingerprint does not fit the 39-digit decimal field of the
    /// printable code. Never truncated; always surfaced.
    #[error("fingerprint does not fit 39 decimal digits")]
    EncodingOverflow,

    /// Positional reference-invoice lists differ in length. Raised before
    /// any network call.
    #[error("reference invoice lists differ in length: {0}")]
    MalformedReferenceSet(String),

    /// The request exceeded the configured timeout. Not retried internally.
    #[error("request to the fiscal server timed out")]
    TransportTimeout,

    /// The server answered with a non-success HTTP status.
    #[error("server responded with HTTP {status}: {body}")]
    TransportFailure { status: u16, body: String },

    /// The connection failed before an HTTP status existed (DNS, TLS,
    /// socket).
    #[error("connection failed: {0}")]
    Connection(String),

    /// Client-side configuration could not be applied (proxy, identity).
    #[error("client configuration error: {0}")]
    Config(String),

    /// The decoded response carried an embedded error node.
    #[error("fiscal server error [{code}]: {message}")]
    Protocol { code: String, message: String },

    /// A JWS token could not be produced or decoded.
    #[error("token error: {0}")]
    Token(String),

    /// The response was syntactically valid but missing the expected node.
    #[error("malformed server response: {0}")]
    MalformedResponse(String),
}
