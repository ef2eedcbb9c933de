use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::error::FiscalError;

/// Tax number of a legal entity (8 digits in Slovenia). Only presence is
/// validated; format checks belong to the caller.
pub type TaxNumber = u32;

/// How invoice numbers are assigned within a business premise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum NumberingStructure {
    /// Numbers run per electronic device.
    #[default]
    #[serde(rename = "B")]
    DeviceAssigned,
    /// Numbers run centrally per business premise.
    #[serde(rename = "C")]
    CentrallyAssigned,
}

/// Type codes for movable business premises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MovableType {
    /// A — movable object such as a vehicle or a movable stand.
    #[serde(rename = "A")]
    VehicleOrStand,
    /// B — object at a permanent location, e.g. a market stand.
    #[serde(rename = "B")]
    FixedLocationStand,
    /// C — an individual electronic device when the business uses no
    /// other premises.
    #[serde(rename = "C")]
    ElectronicDevice,
}

fn none_or_empty(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Postal address of an immovable business premise.
///
/// The additional house number is a key-absence field: when it is empty or
/// missing the wire payload carries no `HouseNumberAdditional` key at all.
/// The skip predicate treats `Some("")` like `None`, so struct-literal
/// construction cannot reintroduce an empty string on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PremiseAddress {
    pub street: String,
    pub house_number: String,
    #[serde(skip_serializing_if = "none_or_empty")]
    pub house_number_additional: Option<String>,
    pub community: String,
    pub city: String,
    pub postal_code: String,
}

impl PremiseAddress {
    /// An empty `house_number_additional` is normalized to `None` so it
    /// never serializes as an empty string.
    pub fn new(
        street: impl Into<String>,
        house_number: impl Into<String>,
        house_number_additional: Option<String>,
        community: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            house_number: house_number.into(),
            house_number_additional: house_number_additional.filter(|s| !s.is_empty()),
            community: community.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }
}

/// Cadastral identification of an immovable premise.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PropertyId {
    pub cadastral_number: u32,
    pub building_number: u32,
    pub building_section_number: u32,
}

/// Real-estate block of an immovable premise registration.
#[derive(Debug, Clone, Serialize)]
pub struct RealEstateBp {
    #[serde(rename = "PropertyID")]
    pub property_id: PropertyId,
    #[serde(rename = "Address")]
    pub address: PremiseAddress,
}

/// Location variant of a business premise registration.
///
/// Exactly one of the two wire blocks is emitted: `RealEstateBP` for an
/// immovable premise, `PremiseType` for a movable one. The builder never
/// produces both.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PremiseLocation {
    Immovable {
        #[serde(rename = "RealEstateBP")]
        real_estate: RealEstateBp,
    },
    Movable {
        #[serde(rename = "PremiseType")]
        premise_type: MovableType,
    },
}

impl PremiseLocation {
    pub fn immovable(address: PremiseAddress, property_id: PropertyId) -> Self {
        Self::Immovable {
            real_estate: RealEstateBp {
                property_id,
                address,
            },
        }
    }

    pub fn movable(premise_type: MovableType) -> Self {
        Self::Movable { premise_type }
    }
}

/// Identity of the cash-register software supplier. A domestic supplier is
/// identified by tax number, a foreign one without a Slovenian tax number
/// by name; exactly one key appears on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SoftwareSupplier {
    Domestic {
        #[serde(rename = "TaxNumber")]
        tax_number: TaxNumber,
    },
    Foreign {
        #[serde(rename = "NameForeign")]
        name: String,
    },
}

impl SoftwareSupplier {
    pub fn domestic(tax_number: TaxNumber) -> Self {
        Self::Domestic { tax_number }
    }

    pub fn foreign(name: impl Into<String>) -> Self {
        Self::Foreign { name: name.into() }
    }
}

/// Back-reference to a previously issued invoice, attached when the current
/// invoice corrects or cancels it (storno).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceInvoice {
    pub business_premise_id: String,
    pub electronic_device_id: String,
    pub invoice_number: String,
    pub issued_at: DateTime<Utc>,
}

impl ReferenceInvoice {
    /// Zip four positionally aligned columns into reference records.
    ///
    /// Callers that keep reference data column-wise (one list per field)
    /// use this instead of assembling records by hand. Fails with
    /// [`FiscalError::MalformedReferenceSet`] when the columns differ in
    /// length, before anything touches the network.
    pub fn from_columns(
        business_premise_ids: &[&str],
        electronic_device_ids: &[&str],
        invoice_numbers: &[&str],
        issued_at: &[DateTime<Utc>],
    ) -> Result<Vec<Self>, FiscalError> {
        let len = business_premise_ids.len();
        if electronic_device_ids.len() != len
            || invoice_numbers.len() != len
            || issued_at.len() != len
        {
            return Err(FiscalError::MalformedReferenceSet(format!(
                "premises={}, devices={}, numbers={}, dates={}",
                len,
                electronic_device_ids.len(),
                invoice_numbers.len(),
                issued_at.len(),
            )));
        }

        Ok((0..len)
            .map(|i| Self {
                business_premise_id: business_premise_ids[i].to_string(),
                electronic_device_id: electronic_device_ids[i].to_string(),
                invoice_number: invoice_numbers[i].to_string(),
                issued_at: issued_at[i],
            })
            .collect())
    }
}

/// Back-reference to a prior sales-book entry. Distinct from
/// [`ReferenceInvoice`]: sales-book entries are keyed by set and serial
/// number and carry a date-only issue field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesBookReference {
    pub invoice_number: String,
    pub set_number: String,
    pub serial_number: String,
    pub issued_on: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn empty_additional_house_number_is_none() {
        let addr = PremiseAddress::new("Trzaska cesta", "24", Some(String::new()), "Ljubljana", "Ljubljana", "1000");
        assert!(addr.house_number_additional.is_none());

        let addr = PremiseAddress::new("Trzaska cesta", "24", Some("A".into()), "Ljubljana", "Ljubljana", "1000");
        assert_eq!(addr.house_number_additional.as_deref(), Some("A"));
    }

    #[test]
    fn literal_empty_suffix_never_reaches_the_wire() {
        // Struct-literal construction bypasses new(); the skip predicate
        // still has to drop the key.
        let addr = PremiseAddress {
            street: "Trzaska cesta".into(),
            house_number: "24".into(),
            house_number_additional: Some(String::new()),
            community: "Ljubljana".into(),
            city: "Ljubljana".into(),
            postal_code: "1000".into(),
        };
        let v = serde_json::to_value(&addr).unwrap();
        assert!(v.get("HouseNumberAdditional").is_none());

        let addr = PremiseAddress {
            house_number_additional: Some("A".into()),
            ..addr
        };
        let v = serde_json::to_value(&addr).unwrap();
        assert_eq!(v["HouseNumberAdditional"], "A");
    }

    #[test]
    fn reference_columns_must_align() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let err = ReferenceInvoice::from_columns(&["BP101", "BP101"], &["B1"], &["41", "42"], &[ts, ts])
            .unwrap_err();
        assert!(matches!(err, FiscalError::MalformedReferenceSet(_)));

        let refs =
            ReferenceInvoice::from_columns(&["BP101"], &["B1"], &["41"], &[ts]).unwrap();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].invoice_number, "41");
    }
}
