//! # Validation Module
//!
//! Business-rule checks applied before a line reaches the pricing engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form schema (front end)                                      │
//! │  ├── Required fields, number formats                                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart mutations (Rust)                                        │
//! │  └── THIS MODULE: ranges the pricing math relies on                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Pricing engine                                               │
//! │  └── Pure arithmetic; only guards the inclusive back-calculation       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Taxes with a non-positive value are NOT rejected here: the engine skips
//! them, which is how "zero-rated" or disabled taxes are expressed.
//!
//! ## Usage
//! ```rust
//! use rust_decimal_macros::dec;
//! use tally_core::money::Money;
//! use tally_core::types::DiscountKind;
//! use tally_core::validation::{validate_discount, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_discount(dec!(15), DiscountKind::Percentage, Money::new(dec!(20))).is_ok());
//! assert!(validate_discount(dec!(25), DiscountKind::Fixed, Money::new(dec!(20))).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::compute_discount;
use crate::types::{DiscountKind, LineItem, TaxDefinition, TaxValueType};
use crate::{MAX_AMOUNT, MAX_CART_LINES, MAX_LINE_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 100 characters
/// - No whitespace (ids are UUIDs or backend business keys)
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product id".to_string(),
        });
    }

    if id.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "product id".to_string(),
            max: 100,
        });
    }

    if id.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "product id".to_string(),
            reason: "must not contain whitespace".to_string(),
        });
    }

    Ok(())
}

/// Validates a line's display name.
pub fn validate_line_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: Decimal::ONE,
            max: Decimal::from(MAX_LINE_QUANTITY),
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free items).
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    validate_amount("unit price", price)
}

/// Validates a money amount (price, shipping, order discount, ...).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_AMOUNT
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    let max = Decimal::from(MAX_AMOUNT);
    if amount.amount() > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: Decimal::ZERO,
            max,
        });
    }

    Ok(())
}

/// Validates a discount figure against the line's unit price.
///
/// ## Rules
/// - Must not be negative
/// - Percentage: at most 100
/// - Fixed (per unit): at most the unit price
///
/// Together these keep `subtotal − discount` from going below zero.
pub fn validate_discount(discount: Decimal, kind: DiscountKind, unit_price: Money) -> ValidationResult<()> {
    if discount < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "discount".to_string(),
        });
    }

    let max = match kind {
        DiscountKind::Percentage => Decimal::ONE_HUNDRED,
        DiscountKind::Fixed => unit_price.amount(),
    };

    if discount > max {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: Decimal::ZERO,
            max,
        });
    }

    Ok(())
}

/// Validates one tax definition.
///
/// ## Rules
/// - Name must not be empty
/// - Percentage rates at most 100
/// - Fixed amounts at most MAX_AMOUNT
pub fn validate_tax_definition(tax: &TaxDefinition) -> ValidationResult<()> {
    if tax.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "tax name".to_string(),
        });
    }

    if tax.value_type == TaxValueType::Percentage && tax.value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: format!("tax '{}' rate", tax.name),
            min: Decimal::ZERO,
            max: Decimal::ONE_HUNDRED,
        });
    }

    if tax.value_type == TaxValueType::Fixed && tax.value > Decimal::from(MAX_AMOUNT) {
        return Err(ValidationError::OutOfRange {
            field: format!("tax '{}' amount", tax.name),
            min: Decimal::ZERO,
            max: Decimal::from(MAX_AMOUNT),
        });
    }

    Ok(())
}

/// Validates a complete line before it enters a cart.
///
/// In addition to the field checks, the inclusive fixed taxes of one unit
/// must fit inside its discounted price; otherwise the back-calculated base
/// (and every tax levied on it) would be negative.
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    validate_product_id(&item.product_id)?;
    validate_line_name(&item.name)?;
    validate_quantity(item.quantity)?;
    validate_unit_price(item.unit_price)?;

    if let Some(discount) = item.discount {
        validate_discount(discount, item.discount_kind, item.unit_price)?;
    }

    for tax in &item.taxes {
        validate_tax_definition(tax)?;
    }

    let inclusive_fixed: Decimal = item
        .taxes
        .iter()
        .filter(|tax| tax.is_applicable() && tax.is_inclusive())
        .filter(|tax| tax.value_type == TaxValueType::Fixed)
        .map(|tax| tax.value)
        .sum();

    let unit_discount = compute_discount(item.unit_price, 1, item.discount, item.discount_kind);
    let discounted_unit = (item.unit_price - unit_discount).amount();

    if inclusive_fixed > discounted_unit {
        return Err(ValidationError::OutOfRange {
            field: "inclusive fixed tax".to_string(),
            min: Decimal::ZERO,
            max: discounted_unit,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits in the cart.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: Decimal::ZERO,
            max: Decimal::from(MAX_CART_LINES),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
