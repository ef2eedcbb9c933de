use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{rooted, Header};
use crate::core::{FiscalError, PremiseLocation, SoftwareSupplier, TaxNumber};

/// Marker attached when a premise stops issuing invoices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClosingTag {
    #[serde(rename = "Z")]
    Closed,
}

/// Body of a business premise registration.
///
/// The location variant carries either the real-estate block or the
/// movable premise-type code, never both. Built via
/// [`PremiseRegistrationBuilder`], wrapped with [`BusinessPremise::into_request`]
/// under the `BusinessPremiseRequest` root.
#[derive(Debug, Clone, Serialize)]
pub struct BusinessPremise {
    #[serde(rename = "TaxNumber")]
    pub tax_number: TaxNumber,
    #[serde(rename = "BusinessPremiseID")]
    pub business_premise_id: String,
    #[serde(rename = "BPIdentifier")]
    pub identifier: PremiseLocation,
    #[serde(rename = "ValidityDate")]
    pub validity_date: NaiveDate,
    /// One-element list on the wire.
    #[serde(rename = "SoftwareSupplier")]
    pub software_supplier: Vec<SoftwareSupplier>,
    #[serde(rename = "SpecialNotes")]
    pub special_notes: String,
    /// `"Z"` when the premise closes; the key is absent otherwise.
    #[serde(rename = "ClosingTag", skip_serializing_if = "Option::is_none")]
    pub closing_tag: Option<ClosingTag>,
}

impl BusinessPremise {
    /// Wrap the body and header under the registration root key.
    pub fn into_request(self, header: Header) -> Result<Value, FiscalError> {
        #[derive(Serialize)]
        struct Request {
            #[serde(rename = "Header")]
            header: Header,
            #[serde(rename = "BusinessPremise")]
            business_premise: BusinessPremise,
        }

        rooted(
            "BusinessPremiseRequest",
            Request {
                header,
                business_premise: self,
            },
        )
    }
}

/// Builder for [`BusinessPremise`].
#[derive(Debug, Clone)]
pub struct PremiseRegistrationBuilder {
    premise: BusinessPremise,
}

impl PremiseRegistrationBuilder {
    pub fn new(
        tax_number: TaxNumber,
        business_premise_id: impl Into<String>,
        identifier: PremiseLocation,
        validity_date: NaiveDate,
        software_supplier: SoftwareSupplier,
    ) -> Self {
        Self {
            premise: BusinessPremise {
                tax_number,
                business_premise_id: business_premise_id.into(),
                identifier,
                validity_date,
                software_supplier: vec![software_supplier],
                special_notes: String::new(),
                closing_tag: None,
            },
        }
    }

    pub fn special_notes(mut self, notes: impl Into<String>) -> Self {
        self.premise.special_notes = notes.into();
        self
    }

    /// Mark the premise as closing instead of registering it.
    pub fn close(mut self) -> Self {
        self.premise.closing_tag = Some(ClosingTag::Closed);
        self
    }

    pub fn build(self) -> BusinessPremise {
        self.premise
    }
}
