//! # Purchase-Order Totals
//!
//! Purchase orders price their lines with the same engine as sales, at
//! supplier unit cost, then add order-level shipping and discount.
//!
//! ```text
//! lines ──► price_line() ──► Σ line_total ──┐
//!                                           ├──► + shipping − order_discount
//!                                           │         │
//!                                           │         ▼
//!                                           │   round to cents, floor at 0
//!                                           ▼
//!                                     grand_total
//! ```
//!
//! Unlike the sales cart there is no whole-unit rounding: supplier invoices
//! settle to the cent.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::pricing::price_line;
use crate::types::{LineItem, PricedLine};
use crate::validation::{validate_amount, validate_line_item};

/// A purchase order as edited in the purchase-order form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    /// Lines priced at supplier unit cost.
    pub lines: Vec<LineItem>,
    #[serde(default)]
    pub shipping: Money,
    /// Flat discount on the whole order.
    #[serde(default)]
    pub order_discount: Money,
}

/// Totals of a purchase order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderTotals {
    pub lines: Vec<PricedLine>,
    /// Σ unit_cost × quantity
    pub subtotal: Money,
    /// Σ line discounts
    pub discount: Money,
    /// Σ line tax (inclusive + exclusive)
    pub tax: Money,
    /// Σ line totals
    pub lines_total: Money,
    pub shipping: Money,
    pub order_discount: Money,
    pub grand_total: Money,
}

/// Prices every line of a purchase order and computes its totals.
///
/// ## Errors
/// - Validation errors for invalid lines, or shipping/discount that is
///   negative or above [`MAX_AMOUNT`](crate::MAX_AMOUNT)
/// - [`CoreError::InvalidTaxConfiguration`](crate::CoreError::InvalidTaxConfiguration)
///   from the engine
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use tally_core::money::Money;
/// use tally_core::purchase::{purchase_order_totals, PurchaseOrder};
/// use tally_core::types::{LineItem, TaxDefinition, TaxKind};
///
/// let order = PurchaseOrder {
///     lines: vec![LineItem::new("flour", "Flour 25kg", Money::new(dec!(18.40)), 10)
///         .with_tax(TaxDefinition::percentage("VAT", TaxKind::Exclusive, dec!(5)))],
///     shipping: Money::new(dec!(12.5)),
///     order_discount: Money::new(dec!(4)),
/// };
///
/// let totals = purchase_order_totals(&order).unwrap();
/// assert_eq!(totals.lines_total, Money::new(dec!(193.2)));
/// assert_eq!(totals.grand_total, Money::new(dec!(201.7)));
/// ```
pub fn purchase_order_totals(order: &PurchaseOrder) -> CoreResult<PurchaseOrderTotals> {
    validate_amount("shipping", order.shipping)?;
    validate_amount("order discount", order.order_discount)?;

    let mut lines = Vec::with_capacity(order.lines.len());
    for item in &order.lines {
        validate_line_item(item)?;
        lines.push(price_line(item)?);
    }

    let subtotal: Money = lines.iter().map(|line| line.subtotal).sum();
    let discount: Money = lines.iter().map(|line| line.discount_amount).sum();
    let tax: Money = lines.iter().map(|line| line.tax_amount).sum();
    let lines_total: Money = lines.iter().map(|line| line.line_total).sum();

    let grand_total = (lines_total + order.shipping - order.order_discount)
        .round_to_cents()
        .max(Money::zero());

    Ok(PurchaseOrderTotals {
        lines,
        subtotal,
        discount,
        tax,
        lines_total,
        shipping: order.shipping,
        order_discount: order.order_discount,
        grand_total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
