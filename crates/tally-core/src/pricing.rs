//! # Line-Item Pricing Engine
//!
//! Turns one cart line (price, quantity, discount, taxes) into its payable
//! figures. Used by both the sales cart and purchase orders.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Pricing Pipeline                                │
//! │                                                                         │
//! │  unit_price × quantity ──► subtotal                                     │
//! │                               │                                         │
//! │                 compute_discount() ──► discount_amount                  │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                     discounted_price (tax-inclusive)                    │
//! │                               │                                         │
//! │         back out inclusive taxes (fixed first, then rates)              │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                     net_taxable_amount ──┬──► inclusive contributions   │
//! │                                          └──► exclusive contributions   │
//! │                                                                         │
//! │  final_payable = discounted_price + exclusive tax                       │
//! │  (inclusive tax is already inside discounted_price)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use rust_decimal_macros::dec;
//! use tally_core::money::Money;
//! use tally_core::pricing::compute_line_taxes;
//! use tally_core::types::{TaxDefinition, TaxKind};
//!
//! // 110 already contains 10% VAT; 5% service charge is added on top
//! let taxes = vec![
//!     TaxDefinition::percentage("VAT", TaxKind::Inclusive, dec!(10)),
//!     TaxDefinition::percentage("Service", TaxKind::Exclusive, dec!(5)),
//! ];
//! let result = compute_line_taxes(Money::new(dec!(110)), 1, Money::zero(), &taxes).unwrap();
//!
//! assert_eq!(result.taxable_amount, Money::new(dec!(100)));
//! assert_eq!(result.tax_amount, Money::new(dec!(15)));
//! assert_eq!(result.final_payable, Money::new(dec!(115)));
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{
    DiscountKind, LineItem, LineTaxes, PricedLine, TaxBreakdownEntry, TaxDefinition, TaxKind,
    TaxValueType,
};

// =============================================================================
// Discount
// =============================================================================

/// Computes the discount amount for a line.
///
/// ## Rules
/// - `None` or `<= 0` discount → zero
/// - `Percentage` → `unit_price × quantity × discount / 100`
/// - `Fixed` → `discount × quantity` (flat amount per unit)
///
/// The result is not clamped to the subtotal; the cart's validation keeps
/// discounts within range before lines are priced.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use tally_core::money::Money;
/// use tally_core::pricing::compute_discount;
/// use tally_core::types::DiscountKind;
///
/// let price = Money::new(dec!(50));
/// assert_eq!(
///     compute_discount(price, 3, Some(dec!(10)), DiscountKind::Fixed),
///     Money::new(dec!(30))
/// );
/// assert_eq!(
///     compute_discount(price, 3, Some(dec!(10)), DiscountKind::Percentage),
///     Money::new(dec!(15))
/// );
/// ```
pub fn compute_discount(
    unit_price: Money,
    quantity: u32,
    discount: Option<Decimal>,
    discount_kind: DiscountKind,
) -> Money {
    let discount = match discount {
        Some(value) if value > Decimal::ZERO => value,
        _ => return Money::zero(),
    };

    match discount_kind {
        DiscountKind::Percentage => unit_price.multiply_quantity(quantity).percent_of(discount),
        DiscountKind::Fixed => Money::new(discount).multiply_quantity(quantity),
    }
}

// =============================================================================
// Taxes
// =============================================================================

/// Computes every tax figure for one line.
///
/// ## Algorithm
/// 1. `discounted_price = unit_price × quantity − discount_amount`
/// 2. No taxes → nothing to do, the discounted price is payable as-is
/// 3. Sum inclusive percentage rates and inclusive fixed amounts
///    (fixed amounts scale with quantity); non-positive values are skipped
/// 4. `net = (discounted_price − inclusive_fixed) / (1 + inclusive_rate / 100)`
/// 5. Every applicable tax (inclusive first, then exclusive) is computed
///    from `net`: percentage → `net × value / 100`, fixed → `value × quantity`
/// 6. `final_payable = discounted_price + exclusive_total`
///
/// Exclusive taxes are levied on the same `net` as inclusive ones, never on
/// the tax-inclusive discounted price.
///
/// ## Errors
/// [`CoreError::InvalidTaxConfiguration`] when the inclusive rates leave a
/// back-calculation denominator of zero or less.
pub fn compute_line_taxes(
    unit_price: Money,
    quantity: u32,
    discount_amount: Money,
    taxes: &[TaxDefinition],
) -> CoreResult<LineTaxes> {
    let discounted_price = unit_price.multiply_quantity(quantity) - discount_amount;

    if taxes.is_empty() {
        return Ok(LineTaxes {
            tax_amount: Money::zero(),
            taxable_amount: discounted_price,
            final_payable: discounted_price,
            tax_breakdown: Vec::new(),
            has_exclusive: false,
            has_inclusive: false,
        });
    }

    let (inclusive, exclusive): (Vec<&TaxDefinition>, Vec<&TaxDefinition>) = taxes
        .iter()
        .filter(|tax| tax.is_applicable())
        .partition(|tax| tax.is_inclusive());

    let mut inclusive_rate = Decimal::ZERO;
    let mut inclusive_fixed = Money::zero();
    for tax in &inclusive {
        match tax.value_type {
            TaxValueType::Percentage => inclusive_rate += tax.value,
            TaxValueType::Fixed => inclusive_fixed += Money::new(tax.value).multiply_quantity(quantity),
        }
    }

    let net_taxable = back_out_inclusive(discounted_price, inclusive_fixed, inclusive_rate)?;

    let mut tax_breakdown = Vec::with_capacity(inclusive.len() + exclusive.len());
    let mut inclusive_total = Money::zero();
    let mut exclusive_total = Money::zero();

    for tax in &inclusive {
        let amount = tax_contribution(tax, net_taxable, quantity);
        inclusive_total += amount;
        tax_breakdown.push(breakdown_entry(tax, amount));
    }

    for tax in &exclusive {
        let amount = tax_contribution(tax, net_taxable, quantity);
        exclusive_total += amount;
        tax_breakdown.push(breakdown_entry(tax, amount));
    }

    Ok(LineTaxes {
        tax_amount: inclusive_total + exclusive_total,
        taxable_amount: net_taxable,
        final_payable: discounted_price + exclusive_total,
        tax_breakdown,
        has_exclusive: !exclusive.is_empty(),
        has_inclusive: !inclusive.is_empty(),
    })
}

/// Prices a whole line: discount, taxes and payable total.
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use tally_core::money::Money;
/// use tally_core::pricing::price_line;
/// use tally_core::types::{DiscountKind, LineItem, TaxDefinition, TaxKind};
///
/// let line = LineItem::new("p-1", "Olive oil", Money::new(dec!(50)), 3)
///     .with_discount(dec!(10), DiscountKind::Fixed)
///     .with_tax(TaxDefinition::percentage("GST", TaxKind::Exclusive, dec!(8)));
///
/// let priced = price_line(&line).unwrap();
/// assert_eq!(priced.discount_amount, Money::new(dec!(30)));
/// assert_eq!(priced.line_total, Money::new(dec!(129.6)));
/// ```
pub fn price_line(item: &LineItem) -> CoreResult<PricedLine> {
    let discount_amount = compute_discount(
        item.unit_price,
        item.quantity,
        item.discount,
        item.discount_kind,
    );
    let taxes = compute_line_taxes(item.unit_price, item.quantity, discount_amount, &item.taxes)?;

    Ok(PricedLine {
        item: item.clone(),
        subtotal: item.subtotal(),
        discount_amount,
        tax_amount: taxes.tax_amount,
        taxable_amount: taxes.taxable_amount,
        tax_breakdown: taxes.tax_breakdown,
        line_total: taxes.final_payable,
        has_inclusive: taxes.has_inclusive,
        has_exclusive: taxes.has_exclusive,
    })
}

/// Removes inclusive taxes from a tax-inclusive amount.
///
/// If a price P contains a k% tax, the pre-tax value is `P / (1 + k/100)`.
/// Fixed inclusive amounts are absolute, so they come off before dividing.
fn back_out_inclusive(
    discounted_price: Money,
    inclusive_fixed: Money,
    inclusive_rate: Decimal,
) -> CoreResult<Money> {
    let denominator = Decimal::ONE + inclusive_rate / Decimal::ONE_HUNDRED;
    if denominator <= Decimal::ZERO {
        return Err(CoreError::InvalidTaxConfiguration {
            total_rate: inclusive_rate,
        });
    }

    Ok(Money::new(
        (discounted_price - inclusive_fixed).amount() / denominator,
    ))
}

fn tax_contribution(tax: &TaxDefinition, net_taxable: Money, quantity: u32) -> Money {
    match tax.value_type {
        TaxValueType::Percentage => net_taxable.percent_of(tax.value),
        TaxValueType::Fixed => Money::new(tax.value).multiply_quantity(quantity),
    }
}

fn breakdown_entry(tax: &TaxDefinition, amount: Money) -> TaxBreakdownEntry {
    TaxBreakdownEntry {
        name: tax.name.clone(),
        kind: tax.kind,
        value_type: tax.value_type,
        value: tax.value,
        amount,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn money(value: Decimal) -> Money {
        Money::new(value)
    }

    fn inclusive_pct(name: &str, rate: Decimal) -> TaxDefinition {
        TaxDefinition::percentage(name, TaxKind::Inclusive, rate)
    }

    fn exclusive_pct(name: &str, rate: Decimal) -> TaxDefinition {
        TaxDefinition::percentage(name, TaxKind::Exclusive, rate)
    }

    // -------------------------------------------------------------------------
    // compute_discount
    // -------------------------------------------------------------------------

    #[test]
    fn test_discount_absent_or_non_positive_is_zero() {
        let price = money(dec!(100));
        assert_eq!(compute_discount(price, 2, None, DiscountKind::Percentage), Money::zero());
        assert_eq!(compute_discount(price, 2, Some(dec!(0)), DiscountKind::Fixed), Money::zero());
        assert_eq!(compute_discount(price, 2, Some(dec!(-5)), DiscountKind::Fixed), Money::zero());
    }

    #[test]
    fn test_percentage_discount_scales_with_subtotal() {
        let discount = compute_discount(money(dec!(19.99)), 4, Some(dec!(12.5)), DiscountKind::Percentage);
        // 79.96 × 12.5% = 9.995
        assert_eq!(discount, money(dec!(9.995)));
    }

    #[test]
    fn test_fixed_discount_is_per_unit() {
        let discount = compute_discount(money(dec!(50)), 3, Some(dec!(10)), DiscountKind::Fixed);
        assert_eq!(discount, money(dec!(30)));
    }

    // -------------------------------------------------------------------------
    // compute_line_taxes
    // -------------------------------------------------------------------------

    #[test]
    fn test_no_taxes_pays_discounted_price() {
        let result = compute_line_taxes(money(dec!(40)), 3, money(dec!(12)), &[]).unwrap();

        assert_eq!(result.tax_amount, Money::zero());
        assert_eq!(result.taxable_amount, money(dec!(108)));
        assert_eq!(result.final_payable, money(dec!(108)));
        assert!(result.tax_breakdown.is_empty());
        assert!(!result.has_inclusive);
        assert!(!result.has_exclusive);
    }

    #[test]
    fn test_exclusive_only() {
        let taxes = [exclusive_pct("VAT", dec!(10))];
        let result = compute_line_taxes(money(dec!(100)), 2, Money::zero(), &taxes).unwrap();

        assert_eq!(result.taxable_amount, money(dec!(200)));
        assert_eq!(result.tax_amount, money(dec!(20)));
        assert_eq!(result.final_payable, money(dec!(220)));
        assert!(result.has_exclusive);
        assert!(!result.has_inclusive);
    }

    #[test]
    fn test_inclusive_only_does_not_change_payable() {
        let taxes = [inclusive_pct("VAT", dec!(10))];
        let result = compute_line_taxes(money(dec!(110)), 1, Money::zero(), &taxes).unwrap();

        assert_eq!(result.taxable_amount, money(dec!(100)));
        assert_eq!(result.total_of(TaxKind::Inclusive), money(dec!(10)));
        assert_eq!(result.final_payable, money(dec!(110)));
        assert!(result.has_inclusive);
        assert!(!result.has_exclusive);
    }

    #[test]
    fn test_mixed_inclusive_and_exclusive() {
        let taxes = [exclusive_pct("Service", dec!(5)), inclusive_pct("VAT", dec!(10))];
        let result = compute_line_taxes(money(dec!(110)), 1, Money::zero(), &taxes).unwrap();

        assert_eq!(result.taxable_amount, money(dec!(100)));
        assert_eq!(result.total_of(TaxKind::Inclusive), money(dec!(10)));
        assert_eq!(result.total_of(TaxKind::Exclusive), money(dec!(5)));
        assert_eq!(result.final_payable, money(dec!(115)));
        assert_eq!(result.tax_amount, money(dec!(15)));

        // Inclusive entries come first regardless of input order
        let kinds: Vec<TaxKind> = result.tax_breakdown.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![TaxKind::Inclusive, TaxKind::Exclusive]);
    }

    #[test]
    fn test_fixed_discount_then_exclusive_percentage() {
        let discount = compute_discount(money(dec!(50)), 3, Some(dec!(10)), DiscountKind::Fixed);
        let taxes = [exclusive_pct("GST", dec!(8))];
        let result = compute_line_taxes(money(dec!(50)), 3, discount, &taxes).unwrap();

        assert_eq!(discount, money(dec!(30)));
        assert_eq!(result.taxable_amount, money(dec!(120)));
        assert_eq!(result.tax_amount, money(dec!(9.6)));
        assert_eq!(result.final_payable, money(dec!(129.6)));
    }

    #[test]
    fn test_inclusive_fixed_is_removed_before_rate() {
        // 2 × 115 = 230 contains a 5/unit levy and a 10% rate:
        // (230 − 10) / 1.10 = 200
        let taxes = [
            TaxDefinition::fixed("Levy", TaxKind::Inclusive, dec!(5)),
            inclusive_pct("VAT", dec!(10)),
        ];
        let result = compute_line_taxes(money(dec!(115)), 2, Money::zero(), &taxes).unwrap();

        assert_eq!(result.taxable_amount, money(dec!(200)));
        assert_eq!(result.tax_breakdown[0].amount, money(dec!(10)));
        assert_eq!(result.tax_breakdown[1].amount, money(dec!(20)));
        assert_eq!(result.final_payable, money(dec!(230)));
    }

    #[test]
    fn test_exclusive_uses_net_not_discounted_price() {
        let taxes = [inclusive_pct("VAT", dec!(25)), exclusive_pct("City", dec!(2))];
        let result = compute_line_taxes(money(dec!(125)), 1, Money::zero(), &taxes).unwrap();

        // net = 100, so the city tax is 2 rather than 2.5
        assert_eq!(result.total_of(TaxKind::Exclusive), money(dec!(2)));
        assert_eq!(result.final_payable, money(dec!(127)));
    }

    #[test]
    fn test_exclusive_fixed_scales_with_quantity() {
        let taxes = [TaxDefinition::fixed("Bottle deposit", TaxKind::Exclusive, dec!(0.25))];
        let result = compute_line_taxes(money(dec!(1.5)), 6, Money::zero(), &taxes).unwrap();

        assert_eq!(result.tax_amount, money(dec!(1.5)));
        assert_eq!(result.final_payable, money(dec!(10.5)));
    }

    #[test]
    fn test_non_terminating_back_calculation_keeps_precision() {
        let taxes = [inclusive_pct("GST", dec!(18))];
        let result = compute_line_taxes(money(dec!(100)), 1, Money::zero(), &taxes).unwrap();

        let reconstructed = result.taxable_amount + result.tax_amount;
        assert!((reconstructed.amount() - dec!(100)).abs() < dec!(0.000001));
        assert_eq!(result.taxable_amount.round_to_cents(), money(dec!(84.75)));
        assert_eq!(result.final_payable, money(dec!(100)));
    }

    #[test]
    fn test_non_positive_taxes_are_skipped() {
        let taxes = [
            inclusive_pct("Zero VAT", dec!(0)),
            exclusive_pct("Negative", dec!(-3)),
            TaxDefinition::fixed("Zero levy", TaxKind::Exclusive, dec!(0)),
        ];
        let result = compute_line_taxes(money(dec!(80)), 1, Money::zero(), &taxes).unwrap();

        assert!(result.tax_breakdown.is_empty());
        assert!(!result.has_inclusive);
        assert!(!result.has_exclusive);
        assert_eq!(result.taxable_amount, money(dec!(80)));
        assert_eq!(result.final_payable, money(dec!(80)));
    }

    #[test]
    fn test_zero_denominator_is_rejected() {
        let err = back_out_inclusive(money(dec!(110)), Money::zero(), dec!(-100)).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTaxConfiguration { total_rate } if total_rate == dec!(-100)
        ));

        assert!(back_out_inclusive(money(dec!(110)), Money::zero(), dec!(-150)).is_err());
        assert_eq!(
            back_out_inclusive(money(dec!(110)), Money::zero(), dec!(10)).unwrap(),
            money(dec!(100))
        );
    }

    // -------------------------------------------------------------------------
    // price_line
    // -------------------------------------------------------------------------

    #[test]
    fn test_price_line_assembles_derived_fields() {
        let line = LineItem::new("p-9", "Detergent", money(dec!(110)), 2)
            .with_discount(dec!(10), DiscountKind::Percentage)
            .with_tax(inclusive_pct("VAT", dec!(10)));

        let priced = price_line(&line).unwrap();

        assert_eq!(priced.subtotal, money(dec!(220)));
        assert_eq!(priced.discount_amount, money(dec!(22)));
        // 198 / 1.1 = 180
        assert_eq!(priced.taxable_amount, money(dec!(180)));
        assert_eq!(priced.inclusive_tax(), money(dec!(18)));
        assert_eq!(priced.exclusive_tax(), Money::zero());
        assert_eq!(priced.line_total, money(dec!(198)));
        assert_eq!(priced.item, line);
    }
}
