use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::{rooted, second_stamp, Header};
use crate::core::{
    FiscalError, NumberingStructure, ReferenceInvoice, SellerTaxBreakdown, TaxNumber,
};

/// Per-device invoice key: premise, device, and sequential number.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceIdentifier {
    #[serde(rename = "BusinessPremiseID")]
    pub business_premise_id: String,
    #[serde(rename = "ElectronicDeviceID")]
    pub electronic_device_id: String,
    #[serde(rename = "InvoiceNumber")]
    pub invoice_number: String,
}

impl InvoiceIdentifier {
    pub fn new(
        business_premise_id: impl Into<String>,
        electronic_device_id: impl Into<String>,
        invoice_number: impl Into<String>,
    ) -> Self {
        Self {
            business_premise_id: business_premise_id.into(),
            electronic_device_id: electronic_device_id.into(),
            invoice_number: invoice_number.into(),
        }
    }
}

/// Wire form of one storno back-reference.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceInvoiceEntry {
    #[serde(rename = "ReferenceInvoiceIdentifier")]
    pub identifier: InvoiceIdentifier,
    #[serde(rename = "ReferenceInvoiceIssueDateTime", with = "second_stamp")]
    pub issued_at: DateTime<Utc>,
}

impl From<ReferenceInvoice> for ReferenceInvoiceEntry {
    fn from(r: ReferenceInvoice) -> Self {
        Self {
            identifier: InvoiceIdentifier {
                business_premise_id: r.business_premise_id,
                electronic_device_id: r.electronic_device_id,
                invoice_number: r.invoice_number,
            },
            issued_at: r.issued_at,
        }
    }
}

/// Body of an invoice submission, nested as
/// `InvoiceRequest.Invoice` on the wire. Built via [`InvoiceBuilder`].
#[derive(Debug, Clone, Serialize)]
pub struct Invoice {
    #[serde(rename = "TaxNumber")]
    pub tax_number: TaxNumber,
    #[serde(rename = "IssueDateTime", with = "second_stamp")]
    pub issued_at: DateTime<Utc>,
    #[serde(rename = "NumberingStructure")]
    pub numbering_structure: NumberingStructure,
    #[serde(rename = "InvoiceIdentifier")]
    pub identifier: InvoiceIdentifier,
    #[serde(rename = "CustomerVATNumber", skip_serializing_if = "Option::is_none")]
    pub customer_vat_number: Option<TaxNumber>,
    #[serde(rename = "InvoiceAmount", with = "rust_decimal::serde::float")]
    pub invoice_amount: Decimal,
    #[serde(
        rename = "ReturnsAmount",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub returns_amount: Option<Decimal>,
    #[serde(rename = "PaymentAmount", with = "rust_decimal::serde::float")]
    pub payment_amount: Decimal,
    /// Always serialized, empty when no tax applies.
    #[serde(rename = "TaxesPerSeller")]
    pub taxes_per_seller: Vec<SellerTaxBreakdown>,
    #[serde(rename = "OperatorTaxNumber", skip_serializing_if = "Option::is_none")]
    pub operator_tax_number: Option<TaxNumber>,
    #[serde(rename = "ForeignOperator", skip_serializing_if = "Option::is_none")]
    pub foreign_operator: Option<bool>,
    #[serde(rename = "ProtectedID")]
    pub protected_id: String,
    #[serde(rename = "SubsequentSubmit", skip_serializing_if = "Option::is_none")]
    pub subsequent_submit: Option<bool>,
    #[serde(rename = "ReferenceInvoice", skip_serializing_if = "Vec::is_empty")]
    pub reference_invoices: Vec<ReferenceInvoiceEntry>,
    /// Attached, even when empty, whenever a reference is present.
    #[serde(rename = "SpecialNotes", skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
}

impl Invoice {
    /// Wrap the body and header under the `InvoiceRequest` root key.
    pub fn into_request(self, header: Header) -> Result<Value, FiscalError> {
        #[derive(Serialize)]
        struct Request {
            #[serde(rename = "Header")]
            header: Header,
            #[serde(rename = "Invoice")]
            invoice: Invoice,
        }

        rooted(
            "InvoiceRequest",
            Request {
                header,
                invoice: self,
            },
        )
    }
}

/// Builder for [`Invoice`].
///
/// Defaults: device-assigned numbering, payment amount equal to the
/// invoice amount, no conditional fields. Free-text notes only reach the
/// wire when at least one storno reference is attached.
#[derive(Debug, Clone)]
pub struct InvoiceBuilder {
    invoice: Invoice,
    special_notes: String,
}

impl InvoiceBuilder {
    pub fn new(
        tax_number: TaxNumber,
        issued_at: DateTime<Utc>,
        identifier: InvoiceIdentifier,
        invoice_amount: Decimal,
        protected_id: impl Into<String>,
    ) -> Self {
        Self {
            invoice: Invoice {
                tax_number,
                issued_at,
                numbering_structure: NumberingStructure::default(),
                identifier,
                customer_vat_number: None,
                invoice_amount,
                returns_amount: None,
                payment_amount: invoice_amount,
                taxes_per_seller: Vec::new(),
                operator_tax_number: None,
                foreign_operator: None,
                protected_id: protected_id.into(),
                subsequent_submit: None,
                reference_invoices: Vec::new(),
                special_notes: None,
            },
            special_notes: String::new(),
        }
    }

    pub fn numbering_structure(mut self, numbering: NumberingStructure) -> Self {
        self.invoice.numbering_structure = numbering;
        self
    }

    pub fn payment_amount(mut self, amount: Decimal) -> Self {
        self.invoice.payment_amount = amount;
        self
    }

    pub fn customer_vat_number(mut self, tax_number: TaxNumber) -> Self {
        self.invoice.customer_vat_number = Some(tax_number);
        self
    }

    pub fn returns_amount(mut self, amount: Decimal) -> Self {
        self.invoice.returns_amount = Some(amount);
        self
    }

    pub fn operator_tax_number(mut self, tax_number: TaxNumber) -> Self {
        self.invoice.operator_tax_number = Some(tax_number);
        self
    }

    /// The operator has no Slovenian tax number.
    pub fn foreign_operator(mut self) -> Self {
        self.invoice.foreign_operator = Some(true);
        self
    }

    /// The invoice is being reported after an earlier failed submission.
    pub fn subsequent_submit(mut self) -> Self {
        self.invoice.subsequent_submit = Some(true);
        self
    }

    pub fn add_seller_breakdown(mut self, breakdown: SellerTaxBreakdown) -> Self {
        self.invoice.taxes_per_seller.push(breakdown);
        self
    }

    pub fn add_reference(mut self, reference: ReferenceInvoice) -> Self {
        self.invoice.reference_invoices.push(reference.into());
        self
    }

    /// Attach storno references given as four positionally aligned
    /// columns. Fails with [`FiscalError::MalformedReferenceSet`] when the
    /// columns differ in length.
    pub fn references_from_columns(
        mut self,
        business_premise_ids: &[&str],
        electronic_device_ids: &[&str],
        invoice_numbers: &[&str],
        issued_at: &[DateTime<Utc>],
    ) -> Result<Self, FiscalError> {
        let refs = ReferenceInvoice::from_columns(
            business_premise_ids,
            electronic_device_ids,
            invoice_numbers,
            issued_at,
        )?;
        self.invoice
            .reference_invoices
            .extend(refs.into_iter().map(Into::into));
        Ok(self)
    }

    pub fn special_notes(mut self, notes: impl Into<String>) -> Self {
        self.special_notes = notes.into();
        self
    }

    pub fn build(mut self) -> Invoice {
        if !self.invoice.reference_invoices.is_empty() {
            self.invoice.special_notes = Some(self.special_notes);
        }
        self.invoice
    }
}
