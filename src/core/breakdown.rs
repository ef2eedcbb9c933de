use rust_decimal::Decimal;
use serde::Serialize;

use super::types::TaxNumber;

/// One VAT bracket contribution: rate, taxable base, and the tax charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxLineItem {
    #[serde(rename = "TaxRate", with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(rename = "TaxableAmount", with = "rust_decimal::serde::float")]
    pub base: Decimal,
    #[serde(rename = "TaxAmount", with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Tax composition of one seller on an invoice.
///
/// Built once per seller via [`SellerTaxBreakdownBuilder`] and immutable
/// afterwards. A breakdown with no VAT lines and none of the scalar
/// amounts serializes to an empty object.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SellerTaxBreakdown {
    /// Present only when the breakdown belongs to a seller other than the
    /// invoice issuer.
    #[serde(rename = "SellerTaxNumber", skip_serializing_if = "Option::is_none")]
    seller_tax_number: Option<TaxNumber>,
    #[serde(rename = "VAT", skip_serializing_if = "Vec::is_empty")]
    vat: Vec<TaxLineItem>,
    #[serde(
        rename = "NontaxableAmount",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    nontaxable_amount: Option<Decimal>,
    #[serde(
        rename = "ReverseVATTaxableAmount",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    reverse_charge_amount: Option<Decimal>,
    #[serde(
        rename = "ExemptVATTaxableAmount",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    exempt_amount: Option<Decimal>,
    #[serde(
        rename = "OtherTaxesAmount",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    other_taxes_amount: Option<Decimal>,
}

impl SellerTaxBreakdown {
    pub fn builder() -> SellerTaxBreakdownBuilder {
        SellerTaxBreakdownBuilder::default()
    }

    /// True when neither VAT lines nor any scalar amount is set.
    pub fn is_empty(&self) -> bool {
        self.vat.is_empty()
            && self.nontaxable_amount.is_none()
            && self.reverse_charge_amount.is_none()
            && self.exempt_amount.is_none()
            && self.other_taxes_amount.is_none()
    }

    pub fn vat_lines(&self) -> &[TaxLineItem] {
        &self.vat
    }
}

/// Builder for [`SellerTaxBreakdown`].
#[derive(Debug, Clone, Default)]
pub struct SellerTaxBreakdownBuilder {
    inner: SellerTaxBreakdown,
}

impl SellerTaxBreakdownBuilder {
    pub fn seller_tax_number(mut self, tax_number: TaxNumber) -> Self {
        self.inner.seller_tax_number = Some(tax_number);
        self
    }

    /// Append one VAT bracket. Order is preserved on the wire.
    pub fn add_vat(mut self, rate: Decimal, base: Decimal, amount: Decimal) -> Self {
        self.inner.vat.push(TaxLineItem { rate, base, amount });
        self
    }

    pub fn nontaxable_amount(mut self, amount: Decimal) -> Self {
        self.inner.nontaxable_amount = Some(amount);
        self
    }

    pub fn reverse_charge_amount(mut self, amount: Decimal) -> Self {
        self.inner.reverse_charge_amount = Some(amount);
        self
    }

    pub fn exempt_amount(mut self, amount: Decimal) -> Self {
        self.inner.exempt_amount = Some(amount);
        self
    }

    pub fn other_taxes_amount(mut self, amount: Decimal) -> Self {
        self.inner.other_taxes_amount = Some(amount);
        self
    }

    pub fn build(self) -> SellerTaxBreakdown {
        self.inner
    }
}
