//! # Payment Settlement
//!
//! Settles the tenders taken at checkout against a sale's grand total.
//! A sale can be paid with several tenders (split payment).
//!
//! ```text
//! grand_total: 345.00
//! tenders:     Cash 200.00, Card 150.00
//!      │
//!      ▼
//! paid 350.00 ─► due 0.00, change 5.00, status Paid
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::MAX_AMOUNT;

/// How a tender was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    /// Parses the method names the payment form sends.
    ///
    /// Unknown names map to `Other` rather than failing.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "cash" => PaymentMethod::Cash,
            "card" | "credit" | "debit" => PaymentMethod::Card,
            "bank" | "bank_transfer" | "transfer" => PaymentMethod::BankTransfer,
            _ => PaymentMethod::Other,
        }
    }
}

/// One payment towards a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tender {
    pub method: PaymentMethod,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

/// Payment breakdown sent alongside the billing summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub tenders: Vec<Tender>,
    pub paid: Money,
    /// Still owed; never negative.
    pub due: Money,
    /// Returned to the customer; never negative.
    pub change: Money,
    pub status: PaymentStatus,
}

/// Settles tenders against a grand total.
///
/// ## Errors
/// [`CoreError::InvalidPaymentAmount`] for any tender that is not positive
/// or exceeds [`MAX_AMOUNT`].
///
/// ## Example
/// ```rust
/// use rust_decimal_macros::dec;
/// use tally_core::money::Money;
/// use tally_core::payment::{settle, PaymentMethod, PaymentStatus, Tender};
///
/// let tenders = [Tender { method: PaymentMethod::Cash, amount: Money::new(dec!(50)) }];
/// let summary = settle(Money::new(dec!(45)), &tenders).unwrap();
///
/// assert_eq!(summary.change, Money::new(dec!(5)));
/// assert_eq!(summary.status, PaymentStatus::Paid);
/// ```
pub fn settle(grand_total: Money, tenders: &[Tender]) -> CoreResult<PaymentSummary> {
    if let Some(bad) = tenders.iter().find(|tender| !tender.amount.is_positive()) {
        return Err(CoreError::InvalidPaymentAmount {
            reason: format!("{:?} tender of {} must be positive", bad.method, bad.amount),
        });
    }

    let max = Money::new(rust_decimal::Decimal::from(MAX_AMOUNT));
    if let Some(bad) = tenders.iter().find(|tender| tender.amount > max) {
        return Err(CoreError::InvalidPaymentAmount {
            reason: format!("{:?} tender of {} exceeds {}", bad.method, bad.amount, max),
        });
    }

    let paid: Money = tenders.iter().map(|tender| tender.amount).sum();
    let due = (grand_total - paid).max(Money::zero());
    let change = (paid - grand_total).max(Money::zero());

    let status = if paid.is_zero() && grand_total.is_positive() {
        PaymentStatus::Unpaid
    } else if due.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Paid
    };

    Ok(PaymentSummary {
        tenders: tenders.to_vec(),
        paid,
        due,
        change,
        status,
    })
}
