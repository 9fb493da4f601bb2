//! # Sale Commands
//!
//! Recomputes a persisted sale the way the sales form does before submit.
//!
//! ```text
//! document ──► mapping::sale_lines ──► Cart::from_lines ──► recompute()
//!                                                               │
//! stored payments + --tender ──► settle(grand_total) ──────────┤
//!                                                               ▼
//!                                                        SubmitPayload
//! ```

use serde_json::Value;
use tally_core::{settle, Cart, Tender};
use tracing::{debug, info, warn};

use crate::config::QuoteConfig;
use crate::error::AppResult;
use crate::mapping;
use crate::payload::SubmitPayload;

/// Builds the submit payload for a persisted sale.
///
/// `extra_tenders` are appended after any payments stored in the document.
/// Without tenders the payload carries no payment block.
pub fn quote_sale(
    document: &Value,
    extra_tenders: &[Tender],
    config: &QuoteConfig,
) -> AppResult<SubmitPayload> {
    debug!(extra_tenders = extra_tenders.len(), "quote_sale command");

    let lines = mapping::sale_lines(document)?;
    let cart = Cart::from_lines(lines)?;

    if cart.is_empty() {
        warn!("Quoting an empty sale");
    }

    let summary = cart.recompute()?;

    let mut tenders = mapping::tenders(document)?;
    tenders.extend_from_slice(extra_tenders);

    let payments = if tenders.is_empty() {
        None
    } else {
        Some(settle(summary.totals.grand_total, &tenders)?)
    };

    info!(
        lines = summary.totals.line_count,
        grand_total = %summary.totals.grand_total,
        round_off = %summary.totals.round_off,
        tax = %summary.totals.tax,
        total_tax = %summary.totals.total_tax,
        "Sale quoted"
    );

    Ok(SubmitPayload::new(summary, payments, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tally_core::{Money, PaymentMethod, PaymentStatus};

    fn olive_oil_sale() -> Value {
        json!({ "items": [{
            "product_id": "p-1",
            "product_name": "Olive oil",
            "unit_price": "50",
            "quantity": 3,
            "discount": 10,
            "discount_type": "fixed",
            "taxes": [{ "name": "GST", "tax_type": "exclusive", "value_type": "percentage", "value": 8 }]
        }]})
    }

    #[test]
    fn test_quote_sale_totals() {
        let payload = quote_sale(&olive_oil_sale(), &[], &QuoteConfig::default()).unwrap();

        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].line_total, Money::new(dec!(129.6)));
        assert_eq!(payload.billing.grand_total, Money::new(dec!(130)));
        assert_eq!(payload.billing.round_off, Money::new(dec!(0.4)));
        assert!(payload.payments.is_none());
    }

    #[test]
    fn test_duplicate_lines_merge() {
        let doc = json!([
            { "product_id": "p-1", "name": "Pen", "price": 2, "qty": 1 },
            { "product_id": "p-1", "name": "Pen", "price": 2, "qty": 2 }
        ]);

        let payload = quote_sale(&doc, &[], &QuoteConfig::default()).unwrap();
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.items[0].item.quantity, 3);
        assert_eq!(payload.billing.grand_total, Money::new(dec!(6)));
    }

    #[test]
    fn test_stored_and_extra_tenders_settle_together() {
        let mut doc = olive_oil_sale();
        doc["payments"] = json!([{ "method": "card", "amount": 100 }]);

        let extra = [Tender {
            method: PaymentMethod::Cash,
            amount: Money::new(dec!(40)),
        }];

        let payload = quote_sale(&doc, &extra, &QuoteConfig::default()).unwrap();
        let payments = payload.payments.unwrap();

        assert_eq!(payments.tenders.len(), 2);
        assert_eq!(payments.paid, Money::new(dec!(140)));
        assert_eq!(payments.change, Money::new(dec!(10)));
        assert_eq!(payments.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_empty_sale() {
        let payload = quote_sale(&json!({ "items": [] }), &[], &QuoteConfig::default()).unwrap();
        assert_eq!(payload.billing.grand_total, Money::zero());
        assert_eq!(payload.billing.round_off, Money::zero());
    }

    #[test]
    fn test_invalid_line_is_a_validation_error() {
        let doc = json!([{ "product_id": "p-1", "name": "Pen", "price": 2, "qty": 0 }]);
        let err = quote_sale(&doc, &[], &QuoteConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_huge_price_is_a_validation_error() {
        let doc = json!([{
            "product_id": "p-1",
            "name": "Pen",
            "price": "79228162514264337593543950335",
            "qty": 2
        }]);
        let err = quote_sale(&doc, &[], &QuoteConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_zero_tender_is_a_payment_error() {
        let extra = [Tender {
            method: PaymentMethod::Cash,
            amount: Money::zero(),
        }];
        let err = quote_sale(&olive_oil_sale(), &extra, &QuoteConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
    }
}
