//! # Cart & Aggregation
//!
//! The cart owned by a sales (or purchase-order) form, and the aggregator
//! that turns priced lines into billing totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Form Action              Cart Method             Cart Change           │
//! │  ───────────              ───────────             ───────────           │
//! │                                                                         │
//! │  Pick product ───────────► add_line() ──────────► push / merge qty      │
//! │  Change quantity ────────► update_quantity() ───► lines[i].quantity     │
//! │  Change discount ────────► update_discount() ───► lines[i].discount     │
//! │  Click remove ───────────► remove_line() ───────► lines.remove(i)       │
//! │  Submit / reset ─────────► clear() ─────────────► lines.clear()         │
//! │                                                                         │
//! │  After EVERY change the caller invokes recompute():                     │
//! │     lines ──► price_line() each ──► aggregate_cart() ──► CartSummary    │
//! │                                                                         │
//! │  No totals are cached on the cart; recompute() is the only source.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Grand Total Rounding
//! ```text
//! raw_total   = Σ line_total            e.g. 344.60
//! grand_total = round_half_up(raw, 0)   345
//! round_off   = round(grand − raw, 2)   +0.40
//!
//! subtotal − discount + exclusive_tax + round_off == grand_total
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::price_line;
use crate::types::{DiscountKind, LineItem, PricedLine};
use crate::validation::{validate_cart_size, validate_line_item};
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Totals
// =============================================================================

/// Aggregated billing figures for a set of priced lines.
///
/// `tax` and `total_tax` are deliberately distinct: `tax` is only what the
/// customer owes on top of the listed prices, `total_tax` is what the
/// accounting side reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: u64,
    /// Σ unit_price × quantity (gross, before discount)
    pub subtotal: Money,
    pub discount: Money,
    pub inclusive_tax: Money,
    pub exclusive_tax: Money,
    /// Exclusive tax only.
    pub tax: Money,
    /// Inclusive + exclusive tax.
    pub total_tax: Money,
    /// Σ line_total before rounding.
    pub raw_total: Money,
    pub grand_total: Money,
    pub round_off: Money,
    pub has_inclusive_tax: bool,
    pub has_exclusive_tax: bool,
}

/// Priced lines plus their totals, as returned to the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub lines: Vec<PricedLine>,
    pub totals: CartTotals,
}

/// Sums priced lines into billing totals.
///
/// Pure and deterministic: the same lines always produce the same
/// `grand_total` and `round_off`.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use tally_core::cart::aggregate_cart;
/// use tally_core::money::Money;
/// use tally_core::pricing::price_line;
/// use tally_core::types::{LineItem, TaxDefinition, TaxKind};
///
/// let line = LineItem::new("p-1", "Tea", Money::new(dec!(4.30)), 1)
///     .with_tax(TaxDefinition::percentage("VAT", TaxKind::Exclusive, dec!(5)));
/// let totals = aggregate_cart(&[price_line(&line).unwrap()]);
///
/// assert_eq!(totals.raw_total, Money::new(dec!(4.515)));
/// assert_eq!(totals.grand_total, Money::new(dec!(5)));
/// assert_eq!(totals.round_off, Money::new(dec!(0.49)));
/// ```
pub fn aggregate_cart(lines: &[PricedLine]) -> CartTotals {
    let mut totals = CartTotals {
        line_count: lines.len(),
        ..CartTotals::default()
    };

    for line in lines {
        let inclusive = line.inclusive_tax();
        let exclusive = line.exclusive_tax();

        totals.total_quantity += u64::from(line.item.quantity);
        totals.subtotal += line.subtotal;
        totals.discount += line.discount_amount;
        totals.inclusive_tax += inclusive;
        totals.exclusive_tax += exclusive;
        totals.raw_total += line.line_total;
        totals.has_inclusive_tax |= line.has_inclusive;
        totals.has_exclusive_tax |= line.has_exclusive;
    }

    totals.tax = totals.exclusive_tax;
    totals.total_tax = totals.inclusive_tax + totals.exclusive_tax;
    totals.grand_total = totals.raw_total.round_to_unit();
    totals.round_off = (totals.grand_total - totals.raw_total).round_to_cents();

    totals
}

// =============================================================================
// Cart
// =============================================================================

/// The in-memory cart of one form instance.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product merges quantity)
/// - Quantity is > 0 (updating to 0 removes the line)
/// - At most `MAX_CART_LINES` lines, at most `MAX_LINE_QUANTITY` per line
/// - Every stored line passed `validate_line_item`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<LineItem>,
    created_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates an empty cart (form mounted for a new sale).
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Builds a cart from persisted lines (form mounted to edit an order).
    ///
    /// Lines go through `add_line`, so duplicates merge and invalid lines
    /// are rejected exactly as if the cashier had entered them.
    pub fn from_lines(lines: impl IntoIterator<Item = LineItem>) -> CoreResult<Self> {
        let mut cart = Cart::new();
        for line in lines {
            cart.add_line(line)?;
        }
        Ok(cart)
    }

    /// Adds a line, or increases the quantity of an existing line for the
    /// same product.
    ///
    /// A merged line keeps its original price, discount and taxes.
    pub fn add_line(&mut self, item: LineItem) -> CoreResult<()> {
        validate_line_item(&item)?;

        if let Some(existing) = self.find_mut(&item.product_id) {
            let requested = existing.quantity.saturating_add(item.quantity);
            if requested > MAX_LINE_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested,
                    max: MAX_LINE_QUANTITY,
                });
            }
            existing.quantity = requested;
            return Ok(());
        }

        validate_cart_size(self.lines.len()).map_err(|_| CoreError::CartTooLarge {
            max: MAX_CART_LINES,
        })?;

        self.lines.push(item);
        Ok(())
    }

    /// Sets a line's quantity; zero removes the line.
    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> CoreResult<()> {
        if quantity == 0 {
            return self.remove_line(product_id);
        }

        if quantity > MAX_LINE_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            });
        }

        let line = self
            .find_mut(product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Replaces a line's discount. `None` clears it.
    ///
    /// The whole line is revalidated, since a deeper discount can leave no
    /// room for the line's inclusive fixed taxes.
    pub fn update_discount(
        &mut self,
        product_id: &str,
        discount: Option<Decimal>,
        kind: DiscountKind,
    ) -> CoreResult<()> {
        let line = self
            .find_mut(product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        let mut updated = line.clone();
        updated.discount = discount;
        updated.discount_kind = kind;
        validate_line_item(&updated)?;

        *line = updated;
        Ok(())
    }

    /// Removes the line for a product.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::LineNotFound(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.created_at = Utc::now();
    }

    /// Prices every line and aggregates the totals.
    pub fn recompute(&self) -> CoreResult<CartSummary> {
        let lines = self
            .lines
            .iter()
            .map(price_line)
            .collect::<CoreResult<Vec<_>>>()?;
        let totals = aggregate_cart(&lines);

        Ok(CartSummary { lines, totals })
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&LineItem> {
        self.lines.iter().find(|line| line.product_id == product_id)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn find_mut(&mut self, product_id: &str) -> Option<&mut LineItem> {
        self.lines.iter_mut().find(|line| line.product_id == product_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
