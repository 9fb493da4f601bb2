//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Pricing, cart and payment failures             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-quote errors (app crate)                                        │
//! │  ├── MappingError     - Backend JSON that cannot become a LineItem     │
//! │  └── AppError         - What the caller sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → Form toast             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, tax name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Pure arithmetic on valid input never errors

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Inclusive percentage taxes leave no positive base to back-calculate from.
    ///
    /// ## When This Occurs
    /// The back-calculation divides the discounted price by
    /// `1 + total_inclusive_rate / 100`. A denominator of zero (or less)
    /// would produce `Infinity`/`NaN`, so it is reported instead.
    ///
    /// ```text
    /// discounted_price: 110
    /// inclusive rates:  Σ = -100%
    ///      │
    ///      ▼
    /// 110 / (1 + -100/100) = 110 / 0   ← rejected here
    /// ```
    #[error("Invalid tax configuration: inclusive percentage rate {total_rate}% leaves no taxable base")]
    InvalidTaxConfiguration { total_rate: Decimal },

    /// No cart line exists for the given product.
    #[error("Product {0} not in cart")]
    LineNotFound(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: u32, max: u32 },

    /// Payment amount is invalid.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a line reaches the pricing engine.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: Decimal,
        max: Decimal,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
