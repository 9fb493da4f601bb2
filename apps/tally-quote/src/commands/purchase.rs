//! # Purchase-Order Commands

use serde_json::Value;
use tally_core::purchase_order_totals;
use tracing::{debug, info};

use crate::config::QuoteConfig;
use crate::error::AppResult;
use crate::mapping;
use crate::payload::PurchaseOrderPayload;

/// Prices a persisted purchase order at supplier cost.
pub fn quote_purchase_order(
    document: &Value,
    config: &QuoteConfig,
) -> AppResult<PurchaseOrderPayload> {
    debug!("quote_purchase_order command");

    let order = mapping::purchase_order(document)?;
    let totals = purchase_order_totals(&order)?;

    info!(
        lines = totals.lines.len(),
        shipping = %totals.shipping,
        grand_total = %totals.grand_total,
        "Purchase order quoted"
    );

    Ok(PurchaseOrderPayload::new(totals, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tally_core::Money;

    #[test]
    fn test_quote_purchase_order() {
        let doc = json!({
            "items": [{
                "product_id": "flour",
                "name": "Flour 25kg",
                "unit_cost": "18.40",
                "quantity": 10,
                "taxes": [{ "name": "VAT", "type": "exclusive", "value": 5 }]
            }],
            "shipping": 12.5,
            "order_discount": 4
        });

        let payload = quote_purchase_order(&doc, &QuoteConfig::default()).unwrap();
        assert_eq!(payload.totals.lines_total, Money::new(dec!(193.2)));
        assert_eq!(payload.totals.grand_total, Money::new(dec!(201.7)));
        assert_eq!(payload.grand_total_display, "$201.70");

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["grandTotal"].is_string());
        assert!(json["lines"].is_array());
    }

    #[test]
    fn test_negative_shipping_rejected() {
        let doc = json!({ "items": [], "shipping": -3 });
        let err = quote_purchase_order(&doc, &QuoteConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_missing_cost_is_a_mapping_error() {
        let doc = json!({ "items": [{ "product_id": "flour", "name": "Flour" }] });
        let err = quote_purchase_order(&doc, &QuoteConfig::default()).unwrap_err();
        assert_eq!(err.code, ErrorCode::MappingError);
    }
}
