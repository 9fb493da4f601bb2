//! # Submit Payloads
//!
//! What the forms send to the backend on submit, assembled from the
//! recomputed cart and the settled tenders.
//!
//! ```json
//! {
//!   "reference": "5b0c…",
//!   "storeName": "Tally POS Dev Store",
//!   "currencyCode": "USD",
//!   "generatedAt": "2026-10-19T09:30:00Z",
//!   "items": [ { "item": {…}, "lineTotal": "129.6", … } ],
//!   "billing": { "tax": "9.6", "totalTax": "9.6", "roundOff": "0.4", "grandTotal": "130", … },
//!   "payments": { "paid": "130", "due": "0", "change": "0", "status": "paid", … }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::{CartSummary, CartTotals, Money, PaymentSummary, PricedLine, PurchaseOrderTotals};
use uuid::Uuid;

use crate::config::QuoteConfig;

/// Billing block of a sale payload.
///
/// Carries both `tax` (exclusive only, owed on top of prices) and
/// `total_tax` (inclusive + exclusive, for reporting).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingSummary {
    pub line_count: usize,
    pub total_quantity: u64,
    pub subtotal: Money,
    pub discount: Money,
    pub inclusive_tax: Money,
    pub exclusive_tax: Money,
    pub tax: Money,
    pub total_tax: Money,
    pub round_off: Money,
    pub grand_total: Money,
    /// Grand total formatted for receipts.
    pub grand_total_display: String,
}

impl BillingSummary {
    pub fn from_totals(totals: &CartTotals, config: &QuoteConfig) -> Self {
        BillingSummary {
            line_count: totals.line_count,
            total_quantity: totals.total_quantity,
            subtotal: totals.subtotal,
            discount: totals.discount,
            inclusive_tax: totals.inclusive_tax,
            exclusive_tax: totals.exclusive_tax,
            tax: totals.tax,
            total_tax: totals.total_tax,
            round_off: totals.round_off,
            grand_total: totals.grand_total,
            grand_total_display: config.format_currency(totals.grand_total),
        }
    }
}

/// Sale submit payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub reference: Uuid,
    pub store_name: String,
    pub currency_code: String,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<PricedLine>,
    pub billing: BillingSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payments: Option<PaymentSummary>,
}

impl SubmitPayload {
    pub fn new(
        summary: CartSummary,
        payments: Option<PaymentSummary>,
        config: &QuoteConfig,
    ) -> Self {
        SubmitPayload {
            reference: Uuid::new_v4(),
            store_name: config.store_name.clone(),
            currency_code: config.currency_code.clone(),
            generated_at: Utc::now(),
            billing: BillingSummary::from_totals(&summary.totals, config),
            items: summary.lines,
            payments,
        }
    }
}

/// Purchase-order submit payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderPayload {
    pub reference: Uuid,
    pub store_name: String,
    pub currency_code: String,
    pub generated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub totals: PurchaseOrderTotals,
    pub grand_total_display: String,
}

impl PurchaseOrderPayload {
    pub fn new(totals: PurchaseOrderTotals, config: &QuoteConfig) -> Self {
        PurchaseOrderPayload {
            reference: Uuid::new_v4(),
            store_name: config.store_name.clone(),
            currency_code: config.currency_code.clone(),
            generated_at: Utc::now(),
            grand_total_display: config.format_currency(totals.grand_total),
            totals,
        }
    }
}
