//! Property-based tests for the printable receipt code.

use chrono::{TimeZone, Utc};
use fiskal::fingerprint::{printable_code, RECEIPT_TZ};
use proptest::prelude::*;

proptest! {
    #[test]
    fn printable_code_layout_holds(
        zoi in "[0-9a-f]{32}",
        tax_number in 10_000_000u32..=99_999_999,
        epoch in 1_420_070_400i64..1_893_456_000, // 2015..2030
    ) {
        let issued = Utc.timestamp_opt(epoch, 0).unwrap();
        let code = printable_code(tax_number, &zoi, issued, RECEIPT_TZ).unwrap();

        // 39 ZOI digits + 8 tax digits + 12 timestamp digits + check digit.
        prop_assert_eq!(code.len(), 60);
        prop_assert!(code.bytes().all(|b| b.is_ascii_digit()));
        let tax_digits = tax_number.to_string();
        prop_assert_eq!(&code[39..47], tax_digits.as_str());

        let digit_sum: u32 = code[..59].bytes().map(|b| u32::from(b - b'0')).sum();
        prop_assert_eq!(code[59..].parse::<u32>().unwrap(), digit_sum % 10);
    }

    #[test]
    fn short_fingerprints_pad_to_39_digits(zoi in "[0-9a-f]{1,8}") {
        let issued = Utc.with_ymd_and_hms(2026, 3, 14, 10, 2, 5).unwrap();
        let code = printable_code(10039856, &zoi, issued, RECEIPT_TZ).unwrap();

        let value = u128::from_str_radix(&zoi, 16).unwrap();
        let padded = format!("{value:039}");
        prop_assert_eq!(&code[..39], padded.as_str());
    }

    #[test]
    fn wide_fingerprints_always_overflow(zoi in "[0-9a-f]{33,64}") {
        // Only reject inputs that genuinely exceed 128 bits; leading
        // zeros keep the value in range.
        prop_assume!(zoi.trim_start_matches('0').len() > 32);
        let issued = Utc.with_ymd_and_hms(2026, 3, 14, 10, 2, 5).unwrap();
        prop_assert!(printable_code(10039856, &zoi, issued, RECEIPT_TZ).is_err());
    }
}
