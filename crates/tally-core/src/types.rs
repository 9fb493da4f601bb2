//! # Domain Types
//!
//! Value records shared by the pricing engine, the cart and the
//! purchase-order totals.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────┐                        │
//! │  │    LineItem     │ 1    * │  TaxDefinition  │                        │
//! │  │  ─────────────  │───────►│  ─────────────  │                        │
//! │  │  unit_price     │        │  kind           │  Inclusive | Exclusive │
//! │  │  quantity       │        │  value_type     │  Percentage | Fixed    │
//! │  │  discount       │        │  value          │                        │
//! │  │  discount_kind  │        └─────────────────┘                        │
//! │  └────────┬────────┘                                                   │
//! │           │ price_line()                                               │
//! │           ▼                                                             │
//! │  ┌─────────────────┐        ┌───────────────────┐                      │
//! │  │   PricedLine    │ 1    * │ TaxBreakdownEntry │                      │
//! │  │  discount_amount│───────►│  amount           │                      │
//! │  │  taxable_amount │        └───────────────────┘                      │
//! │  │  line_total     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Derived figures live only on `PricedLine`; a `LineItem` never caches them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Definition
// =============================================================================

/// Whether the listed price already contains a tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxKind {
    /// Already embedded in the displayed price (MRP-style pricing).
    Inclusive,
    /// Added on top of the discounted price at checkout.
    Exclusive,
}

/// How a tax (or discount) value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TaxValueType {
    /// `value` is a rate in percent (5 = 5%).
    Percentage,
    /// `value` is a flat amount charged per unit.
    Fixed,
}

/// One tax rule attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxDefinition {
    /// Display label, e.g. "VAT" or "Eco levy".
    pub name: String,
    pub kind: TaxKind,
    pub value_type: TaxValueType,
    /// Rate in percent or flat per-unit amount.
    #[ts(type = "string")]
    pub value: Decimal,
}

impl TaxDefinition {
    /// Creates a percentage tax.
    pub fn percentage(name: impl Into<String>, kind: TaxKind, rate: Decimal) -> Self {
        TaxDefinition {
            name: name.into(),
            kind,
            value_type: TaxValueType::Percentage,
            value: rate,
        }
    }

    /// Creates a fixed per-unit tax.
    pub fn fixed(name: impl Into<String>, kind: TaxKind, amount: Decimal) -> Self {
        TaxDefinition {
            name: name.into(),
            kind,
            value_type: TaxValueType::Fixed,
            value: amount,
        }
    }

    /// A tax with `value <= 0` contributes nothing and is skipped.
    #[inline]
    pub fn is_applicable(&self) -> bool {
        self.value > Decimal::ZERO
    }

    #[inline]
    pub fn is_inclusive(&self) -> bool {
        self.kind == TaxKind::Inclusive
    }
}

// =============================================================================
// Discount Kind
// =============================================================================

/// How a line discount figure is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percent of the line subtotal.
    Percentage,
    /// Flat amount off each unit.
    #[default]
    Fixed,
}

// =============================================================================
// Line Item
// =============================================================================

/// One product line in a sale cart or purchase order.
///
/// `unit_price` is the selling price for sales and the supplier cost for
/// purchase orders; the engine treats both the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product identifier (UUID or backend business id).
    pub product_id: String,

    /// Product name at the time the line was created (frozen).
    pub name: String,

    /// Price per unit before discount and tax.
    pub unit_price: Money,

    pub quantity: u32,

    /// Discount figure; `None` or `<= 0` means no discount.
    #[ts(type = "string | null")]
    pub discount: Option<Decimal>,

    #[serde(default)]
    pub discount_kind: DiscountKind,

    /// Applied in order; inclusive entries are reported first.
    #[serde(default)]
    pub taxes: Vec<TaxDefinition>,
}

impl LineItem {
    /// Creates an undiscounted, untaxed line.
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        LineItem {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            discount: None,
            discount_kind: DiscountKind::default(),
            taxes: Vec::new(),
        }
    }

    /// Sets the line discount.
    pub fn with_discount(mut self, discount: Decimal, kind: DiscountKind) -> Self {
        self.discount = Some(discount);
        self.discount_kind = kind;
        self
    }

    /// Appends a tax rule.
    pub fn with_tax(mut self, tax: TaxDefinition) -> Self {
        self.taxes.push(tax);
        self
    }

    /// Gross line value: unit price × quantity.
    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Derived Records
// =============================================================================

/// One tax's contribution to a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdownEntry {
    pub name: String,
    pub kind: TaxKind,
    pub value_type: TaxValueType,
    #[ts(type = "string")]
    pub value: Decimal,
    pub amount: Money,
}

/// Output of the line tax computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineTaxes {
    /// Inclusive + exclusive tax (informational).
    pub tax_amount: Money,
    /// Tax-free base after backing out inclusive taxes.
    pub taxable_amount: Money,
    /// Discounted price plus exclusive tax.
    pub final_payable: Money,
    pub tax_breakdown: Vec<TaxBreakdownEntry>,
    pub has_exclusive: bool,
    pub has_inclusive: bool,
}

impl LineTaxes {
    /// Sum of breakdown amounts of one kind.
    pub fn total_of(&self, kind: TaxKind) -> Money {
        breakdown_total(&self.tax_breakdown, kind)
    }
}

/// A line item together with every figure derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub item: LineItem,
    /// unit_price × quantity
    pub subtotal: Money,
    pub discount_amount: Money,
    pub tax_amount: Money,
    pub taxable_amount: Money,
    pub tax_breakdown: Vec<TaxBreakdownEntry>,
    /// What the customer pays for this line.
    pub line_total: Money,
    pub has_inclusive: bool,
    pub has_exclusive: bool,
}

impl PricedLine {
    /// Inclusive tax embedded in this line.
    pub fn inclusive_tax(&self) -> Money {
        breakdown_total(&self.tax_breakdown, TaxKind::Inclusive)
    }

    /// Exclusive tax added on top of this line.
    pub fn exclusive_tax(&self) -> Money {
        breakdown_total(&self.tax_breakdown, TaxKind::Exclusive)
    }
}

fn breakdown_total(entries: &[TaxBreakdownEntry], kind: TaxKind) -> Money {
    entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .map(|entry| entry.amount)
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
