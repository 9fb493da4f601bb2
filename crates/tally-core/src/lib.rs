//! # tally-core: Pure Pricing Logic for Tally POS
//!
//! This crate holds the numeric heart of the sales and purchase-order forms:
//! line pricing with inclusive/exclusive tax stacking, cart aggregation with
//! commercial rounding, purchase-order totals and payment settlement. Every
//! function is pure; the forms call them again after each change.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            Sales form / Purchase-order form (front end)         │   │
//! │  │    add line ──► change qty/discount ──► submit                  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          tally-quote (backend JSON ⇄ core records)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ pricing  │ │   cart   │ │ purchase │ │ payment  │          │   │
//! │  │   │ discount │ │ aggregate│ │  totals  │ │  settle  │          │   │
//! │  │   │ taxes    │ │ rounding │ │          │ │          │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Tax definitions, line items, priced lines
//! - [`money`] - Decimal money type
//! - [`pricing`] - Line-item pricing engine
//! - [`cart`] - Cart mutations and aggregation
//! - [`purchase`] - Purchase-order totals
//! - [`payment`] - Tender settlement
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use tally_core::{Cart, DiscountKind, LineItem, Money, TaxDefinition, TaxKind};
//!
//! let mut cart = Cart::new();
//! cart.add_line(
//!     LineItem::new("p-1", "Olive oil", Money::new(dec!(50)), 3)
//!         .with_discount(dec!(10), DiscountKind::Fixed)
//!         .with_tax(TaxDefinition::percentage("GST", TaxKind::Exclusive, dec!(8))),
//! )?;
//!
//! let summary = cart.recompute()?;
//! assert_eq!(summary.totals.raw_total, Money::new(dec!(129.6)));
//! assert_eq!(summary.totals.grand_total, Money::new(dec!(130)));
//! assert_eq!(summary.totals.round_off, Money::new(dec!(0.4)));
//! # Ok::<(), tally_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod payment;
pub mod pricing;
pub mod purchase;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{aggregate_cart, Cart, CartSummary, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use payment::{settle, PaymentMethod, PaymentStatus, PaymentSummary, Tender};
pub use pricing::{compute_discount, compute_line_taxes, price_line};
pub use purchase::{purchase_order_totals, PurchaseOrder, PurchaseOrderTotals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps submit payloads reasonably sized.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity on a single line.
///
/// ## Business Reason
/// Catches typos at the till (1000 instead of 10).
pub const MAX_LINE_QUANTITY: u32 = 999;

/// Largest single amount accepted: unit price, fixed tax, shipping, tender.
///
/// ## Business Reason
/// Keeps every product of amount × quantity × rate well inside `Decimal`
/// range, so pricing never overflows.
pub const MAX_AMOUNT: i64 = 1_000_000_000;
