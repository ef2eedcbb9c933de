//! # fiskal
//!
//! Client library for the Slovenian FURS fiscal cash-register protocol:
//! business premise registration, invoice fingerprints (ZOI), printable
//! receipt codes, invoice and sales-book submission for the unique
//! registration code (EOR), over a signed JWS transport.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! Requests are typed serde structs; optional protocol fields are absent
//! keys on the wire, never empty strings.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{NaiveDate, TimeZone, Utc};
//! use fiskal::core::*;
//! use fiskal::message::{Header, PremiseRegistrationBuilder};
//!
//! let premise = PremiseRegistrationBuilder::new(
//!     10039856,
//!     "BP101",
//!     PremiseLocation::movable(MovableType::VehicleOrStand),
//!     NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
//!     SoftwareSupplier::domestic(24564444),
//! )
//! .build();
//!
//! let header = Header::new("b9f2-test", Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap());
//! let request = premise.into_request(header).unwrap();
//! assert_eq!(request["BusinessPremiseRequest"]["BusinessPremise"]["BPIdentifier"]["PremiseType"], "A");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `client` (default) | HTTPS transport and the high-level [`client::FiscalClient`] |
//!
//! Without `client` the crate still offers fingerprinting, printable
//! codes, message building and JWS tokens, with no HTTP dependency.

pub mod core;
pub mod fingerprint;
pub mod keystore;
pub mod message;
pub mod token;

#[cfg(feature = "client")]
pub mod client;

// Re-export core types at crate root for convenience
pub use crate::core::*;
