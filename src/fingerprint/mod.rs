//! Invoice protective mark (ZOI) and the printable receipt code.

mod printable;
mod zoi;

pub use printable::{printable_code, RECEIPT_TZ};
pub use zoi::calculate_zoi;
