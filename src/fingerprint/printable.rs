use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::core::{FiscalError, TaxNumber};

/// Timezone the receipt timestamp is printed in.
pub const RECEIPT_TZ: Tz = chrono_tz::Europe::Ljubljana;

/// Render the data record printed as QR / Code128 / PDF417 on the receipt.
///
/// Layout: the ZOI reinterpreted as a base-10 integer and zero-padded to
/// 39 digits, the decimal tax number, the issue timestamp converted to
/// `tz` and formatted `YYMMDDHHMMSS`, and a trailing check digit equal to
/// the digit sum of everything before it, mod 10.
///
/// A 32-hex-character ZOI always fits 39 decimal digits. A wider or
/// non-hex fingerprint fails with [`FiscalError::EncodingOverflow`]; the
/// code is never truncated.
pub fn printable_code(
    tax_number: TaxNumber,
    zoi: &str,
    issued_at: DateTime<Utc>,
    tz: Tz,
) -> Result<String, FiscalError> {
    let zoi_value =
        u128::from_str_radix(zoi, 16).map_err(|_| FiscalError::EncodingOverflow)?;

    let stamp = issued_at.with_timezone(&tz).format("%y%m%d%H%M%S");
    let data = format!("{zoi_value:039}{tax_number}{stamp}");

    let digit_sum: u32 = data.bytes().map(|b| u32::from(b - b'0')).sum();
    Ok(format!("{data}{}", digit_sum % 10))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const ZOI: &str = "1f1ad26df9c9c79e27b7e69be2856297";

    #[test]
    fn layout_and_check_digit() {
        let issued = Utc.with_ymd_and_hms(2015, 8, 15, 10, 2, 5).unwrap();
        let code = printable_code(10039856, ZOI, issued, RECEIPT_TZ).unwrap();

        // 39 ZOI digits + 8 tax digits + 12 timestamp digits + check digit
        assert_eq!(code.len(), 60);
        assert_eq!(&code[39..47], "10039856");

        let digit_sum: u32 = code[..59].bytes().map(|b| u32::from(b - b'0')).sum();
        assert_eq!(code[59..].parse::<u32>().unwrap(), digit_sum % 10);
    }

    #[test]
    fn timestamp_is_localized() {
        // August is CEST, UTC+2 in Ljubljana.
        let issued = Utc.with_ymd_and_hms(2015, 8, 15, 10, 2, 5).unwrap();
        let code = printable_code(10039856, ZOI, issued, RECEIPT_TZ).unwrap();
        assert_eq!(&code[47..59], "150815120205");
    }

    #[test]
    fn oversized_fingerprint_fails_loudly() {
        let too_wide = "f".repeat(33);
        let err = printable_code(10039856, &too_wide, Utc::now(), RECEIPT_TZ).unwrap_err();
        assert!(matches!(err, FiscalError::EncodingOverflow));
    }
}
