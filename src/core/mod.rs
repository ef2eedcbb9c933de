//! Core value types and the error taxonomy of the fiscal protocol.
//!
//! These types are the vocabulary shared by the fingerprint algorithm,
//! the message builders, and the transport client.

mod breakdown;
mod error;
mod types;

pub use breakdown::*;
pub use error::*;
pub use types::*;
