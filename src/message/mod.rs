//! Typed request payloads for the fiscal endpoints.
//!
//! Each request is a serde struct whose optional fields map to "key absent
//! when unset" on the wire; nothing here mutates JSON maps by hand. The
//! three shapes are premise registration ([`premise`]), invoice submission
//! ([`invoice`]), and sales-book invoice submission ([`sales_book`]).

mod invoice;
mod premise;
mod sales_book;

pub use invoice::*;
pub use premise::*;
pub use sales_book::*;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::core::FiscalError;

/// Common request header: a unique message id and the request timestamp.
///
/// [`Header::new`] takes both values explicitly so tests and replay can be
/// deterministic; [`Header::generate`] is the production convenience.
#[derive(Debug, Clone, Serialize)]
pub struct Header {
    #[serde(rename = "MessageID")]
    pub message_id: String,
    #[serde(rename = "DateTime", with = "second_stamp")]
    pub date_time: DateTime<Utc>,
}

impl Header {
    pub fn new(message_id: impl Into<String>, date_time: DateTime<Utc>) -> Self {
        Self {
            message_id: message_id.into(),
            date_time,
        }
    }

    /// Fresh random message id stamped with the current time.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string(), Utc::now())
    }
}

/// Timestamps on the wire are second-precision ISO-8601 with a `Z` suffix.
pub(crate) mod second_stamp {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%SZ").to_string())
    }
}

/// Nest `body` one level under the endpoint's root key.
pub(crate) fn rooted(root: &str, body: impl Serialize) -> Result<Value, FiscalError> {
    let mut map = serde_json::Map::new();
    map.insert(
        root.to_string(),
        serde_json::to_value(body).map_err(|e| FiscalError::Token(e.to_string()))?,
    );
    Ok(Value::Object(map))
}
