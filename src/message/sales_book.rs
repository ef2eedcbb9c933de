use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::{rooted, Header, ReferenceInvoiceEntry};
use crate::core::{FiscalError, ReferenceInvoice, SalesBookReference, SellerTaxBreakdown, TaxNumber};

/// Sales-book invoice key: invoice number, set number, serial number.
#[derive(Debug, Clone, Serialize)]
pub struct SalesBookIdentifier {
    #[serde(rename = "InvoiceNumber")]
    pub invoice_number: String,
    #[serde(rename = "SetNumber")]
    pub set_number: String,
    #[serde(rename = "SerialNumber")]
    pub serial_number: String,
}

impl SalesBookIdentifier {
    pub fn new(
        invoice_number: impl Into<String>,
        set_number: impl Into<String>,
        serial_number: impl Into<String>,
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            set_number: set_number.into(),
            serial_number: serial_number.into(),
        }
    }
}

/// Wire form of a back-reference to a prior sales-book entry.
#[derive(Debug, Clone, Serialize)]
pub struct SalesBookReferenceEntry {
    #[serde(rename = "ReferenceSalesBookIdentifier")]
    pub identifier: SalesBookIdentifier,
    #[serde(rename = "ReferenceSalesBookIssueDate")]
    pub issued_on: NaiveDate,
}

impl From<SalesBookReference> for SalesBookReferenceEntry {
    fn from(r: SalesBookReference) -> Self {
        Self {
            identifier: SalesBookIdentifier {
                invoice_number: r.invoice_number,
                set_number: r.set_number,
                serial_number: r.serial_number,
            },
            issued_on: r.issued_on,
        }
    }
}

/// Body of a sales-book invoice submission, nested as
/// `InvoiceRequest.SalesBookInvoice` on the wire.
///
/// Structurally parallel to [`super::Invoice`] but keyed by the pre-printed
/// sales-book form and dated day-only. Supports both sales-book and
/// regular invoice back-references.
#[derive(Debug, Clone, Serialize)]
pub struct SalesBookInvoice {
    #[serde(rename = "TaxNumber")]
    pub tax_number: TaxNumber,
    #[serde(rename = "IssueDate")]
    pub issued_on: NaiveDate,
    #[serde(rename = "SalesBookIdentifier")]
    pub identifier: SalesBookIdentifier,
    /// Premise the sales-book form was issued at.
    #[serde(rename = "BusinessPremiseID")]
    pub business_premise_id: String,
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
    #[serde(rename = "TaxesPerSeller")]
    pub taxes_per_seller: Vec<SellerTaxBreakdown>,
    #[serde(rename = "OperatorTaxNumber", skip_serializing_if = "Option::is_none")]
    pub operator_tax_number: Option<TaxNumber>,
    #[serde(rename = "ForeignOperator", skip_serializing_if = "Option::is_none")]
    pub foreign_operator: Option<bool>,
    #[serde(rename = "SubsequentSubmit", skip_serializing_if = "Option::is_none")]
    pub subsequent_submit: Option<bool>,
    #[serde(rename = "ReferenceSalesBook", skip_serializing_if = "Vec::is_empty")]
    pub reference_sales_books: Vec<SalesBookReferenceEntry>,
    #[serde(rename = "ReferenceInvoice", skip_serializing_if = "Vec::is_empty")]
    pub reference_invoices: Vec<ReferenceInvoiceEntry>,
    #[serde(rename = "SpecialNotes", skip_serializing_if = "Option::is_none")]
    pub special_notes: Option<String>,
}

impl SalesBookInvoice {
    /// Wrap the body and header under the `InvoiceRequest` root key.
    pub fn into_request(self, header: Header) -> Result<Value, FiscalError> {
        #[derive(Serialize)]
        struct Request {
            #[serde(rename = "Header")]
            header: Header,
            #[serde(rename = "SalesBookInvoice")]
            sales_book_invoice: SalesBookInvoice,
        }

        rooted(
            "InvoiceRequest",
            Request {
                header,
                sales_book_invoice: self,
            },
        )
    }
}

/// Builder for [`SalesBookInvoice`]. Same defaults and conditional-field
/// rules as [`super::InvoiceBuilder`].
#[derive(Debug, Clone)]
pub struct SalesBookInvoiceBuilder {
    invoice: SalesBookInvoice,
    special_notes: String,
}

impl SalesBookInvoiceBuilder {
    pub fn new(
        tax_number: TaxNumber,
        issued_on: NaiveDate,
        business_premise_id: impl Into<String>,
        identifier: SalesBookIdentifier,
        invoice_amount: Decimal,
    ) -> Self {
        Self {
            invoice: SalesBookInvoice {
                tax_number,
                issued_on,
                identifier,
                business_premise_id: business_premise_id.into(),
                customer_vat_number: None,
                invoice_amount,
                returns_amount: None,
                payment_amount: invoice_amount,
                taxes_per_seller: Vec::new(),
                operator_tax_number: None,
                foreign_operator: None,
                subsequent_submit: None,
                reference_sales_books: Vec::new(),
                reference_invoices: Vec::new(),
                special_notes: None,
            },
            special_notes: String::new(),
        }
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

    pub fn foreign_operator(mut self) -> Self {
        self.invoice.foreign_operator = Some(true);
        self
    }

    pub fn subsequent_submit(mut self) -> Self {
        self.invoice.subsequent_submit = Some(true);
        self
    }

    pub fn add_seller_breakdown(mut self, breakdown: SellerTaxBreakdown) -> Self {
        self.invoice.taxes_per_seller.push(breakdown);
        self
    }

    pub fn add_sales_book_reference(mut self, reference: SalesBookReference) -> Self {
        self.invoice.reference_sales_books.push(reference.into());
        self
    }

    pub fn add_reference(mut self, reference: ReferenceInvoice) -> Self {
        self.invoice.reference_invoices.push(reference.into());
        self
    }

    pub fn special_notes(mut self, notes: impl Into<String>) -> Self {
        self.special_notes = notes.into();
        self
    }

    pub fn build(mut self) -> SalesBookInvoice {
        if !self.invoice.reference_sales_books.is_empty()
            || !self.invoice.reference_invoices.is_empty()
        {
            self.invoice.special_notes = Some(self.special_notes);
        }
        self.invoice
    }
}
