//! # Backend Normalisation
//!
//! Turns loosely-shaped persisted documents into `tally-core` records.
//!
//! Persisted sales and purchase orders come from several generations of the
//! backend, so one field can live under different keys. Every fallback chain
//! is resolved here, once, before any arithmetic runs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Field          Keys tried, in order                                    │
//! │  ─────          ────────────────────                                    │
//! │  product id     product_id │ productId │ product.id │ product._id       │
//! │  name           product_name │ name │ product.name                      │
//! │  unit price     unit_price │ price │ selling_price │ product.price      │
//! │  unit cost      unit_cost │ cost │ purchase_price │ price │ product.cost│
//! │  quantity       quantity │ qty                  (default 1)             │
//! │  discount       discount + discount_type │ discountType  (line level)   │
//! │  taxes          taxes │ product.taxes                                   │
//! │    kind         tax_type │ type          (default exclusive)            │
//! │    value type   value_type │ valueType   (default percentage)           │
//! │    value        value │ rate                                            │
//! │                                                                         │
//! │  Purchase-order document (top level, not per line)                      │
//! │  shipping       shipping │ shipping_cost │ shippingCharge  (default 0)  │
//! │  order discount order_discount │ discount                (default 0)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `discount` means two different things depending on where it sits: inside
//! a line entry it is that line's discount (read with `discount_type`); at
//! the top level of a purchase order it is the flat order discount, used
//! only when `order_discount` is absent.
//!
//! Numbers may arrive as JSON numbers or numeric strings.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use tally_core::{
    DiscountKind, LineItem, Money, PaymentMethod, PurchaseOrder, TaxDefinition, TaxKind,
    TaxValueType, Tender,
};
use thiserror::Error;
use tracing::warn;

const PRODUCT_ID_KEYS: &[&str] = &["product_id", "productId", "product.id", "product._id"];
const NAME_KEYS: &[&str] = &["product_name", "name", "product.name"];
const PRICE_KEYS: &[&str] = &["unit_price", "price", "selling_price", "product.price"];
const COST_KEYS: &[&str] = &["unit_cost", "cost", "purchase_price", "price", "product.cost"];
const QUANTITY_KEYS: &[&str] = &["quantity", "qty"];
const DISCOUNT_KIND_KEYS: &[&str] = &["discount_type", "discountType"];
const TAXES_KEYS: &[&str] = &["taxes", "product.taxes"];
const TAX_KIND_KEYS: &[&str] = &["tax_type", "type"];
const TAX_VALUE_TYPE_KEYS: &[&str] = &["value_type", "valueType"];
const TAX_VALUE_KEYS: &[&str] = &["value", "rate"];
const TAX_NAME_KEYS: &[&str] = &["name", "tax_name", "title"];
const SHIPPING_KEYS: &[&str] = &["shipping", "shipping_cost", "shippingCharge"];
const ORDER_DISCOUNT_KEYS: &[&str] = &["order_discount", "discount"];

/// Document shape problems.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Line {index}: missing {field}")]
    MissingField { index: usize, field: String },

    #[error("Line {index}: invalid {field}: {reason}")]
    InvalidField {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidOrderField { field: String, reason: String },

    #[error("Expected '{field}' to be an array")]
    NotAnArray { field: String },
}

// =============================================================================
// Documents
// =============================================================================

/// Maps a persisted sale into cart lines.
///
/// Accepts either `{"items": [...]}` or a bare array of lines.
///
/// ## Example
/// ```rust
/// use serde_json::json;
/// use tally_quote::mapping::sale_lines;
///
/// let doc = json!({ "items": [
///     { "product": { "_id": "64f0", "name": "Rice 5kg", "price": "12.50" }, "qty": 2 }
/// ]});
/// let lines = sale_lines(&doc).unwrap();
/// assert_eq!(lines[0].product_id, "64f0");
/// assert_eq!(lines[0].quantity, 2);
/// ```
pub fn sale_lines(document: &Value) -> Result<Vec<LineItem>, MappingError> {
    line_array(document, "items")?
        .iter()
        .enumerate()
        .map(|(index, raw)| line_item(index, raw, PRICE_KEYS))
        .collect()
}

/// Maps a persisted purchase order.
pub fn purchase_order(document: &Value) -> Result<PurchaseOrder, MappingError> {
    let lines = line_array(document, "items")?
        .iter()
        .enumerate()
        .map(|(index, raw)| line_item(index, raw, COST_KEYS))
        .collect::<Result<Vec<_>, _>>()?;

    let shipping = optional_money(document, SHIPPING_KEYS, "shipping")?;

    // A top-level `discount` on a purchase order is order-level
    let order_discount = optional_money(document, ORDER_DISCOUNT_KEYS, "order discount")?;

    Ok(PurchaseOrder {
        lines,
        shipping,
        order_discount,
    })
}

/// Maps stored tenders (`payments` array) if the document has any.
pub fn tenders(document: &Value) -> Result<Vec<Tender>, MappingError> {
    let Some(payments) = document.get("payments") else {
        return Ok(Vec::new());
    };

    let entries = payments.as_array().ok_or_else(|| MappingError::NotAnArray {
        field: "payments".to_string(),
    })?;

    entries
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let method = lookup_str(raw, &["method", "payment_method", "type"])
                .map(PaymentMethod::parse)
                .unwrap_or(PaymentMethod::Other);
            let amount = required_decimal(raw, &["amount"], index, "payment amount")?;
            Ok(Tender {
                method,
                amount: Money::new(amount),
            })
        })
        .collect()
}

fn line_array<'a>(document: &'a Value, field: &str) -> Result<&'a Vec<Value>, MappingError> {
    let lines = match document {
        Value::Array(_) => document,
        _ => document.get(field).unwrap_or(&Value::Null),
    };

    lines.as_array().ok_or_else(|| MappingError::NotAnArray {
        field: field.to_string(),
    })
}

// =============================================================================
// Lines
// =============================================================================

fn line_item(index: usize, raw: &Value, price_keys: &[&str]) -> Result<LineItem, MappingError> {
    let product_id = lookup(raw, PRODUCT_ID_KEYS)
        .and_then(id_string)
        .ok_or_else(|| missing(index, "product id"))?;

    let name = lookup_str(raw, NAME_KEYS)
        .ok_or_else(|| missing(index, "product name"))?
        .to_string();

    let unit_price = required_decimal(raw, price_keys, index, "unit price")?;
    let quantity = quantity(index, raw)?;

    let mut item = LineItem::new(product_id, name, Money::new(unit_price), quantity);

    if let Some(value) = lookup(raw, &["discount"]) {
        let discount = to_decimal(value).ok_or_else(|| invalid(index, "discount", value))?;
        item = item.with_discount(discount, discount_kind(index, raw));
    }

    if let Some(taxes) = lookup(raw, TAXES_KEYS) {
        let entries = taxes.as_array().ok_or_else(|| MappingError::NotAnArray {
            field: format!("items[{}].taxes", index),
        })?;
        for entry in entries {
            item = item.with_tax(tax_definition(index, entry)?);
        }
    }

    Ok(item)
}

fn quantity(index: usize, raw: &Value) -> Result<u32, MappingError> {
    let Some(value) = lookup(raw, QUANTITY_KEYS) else {
        return Ok(1);
    };

    to_decimal(value)
        .filter(|qty| qty.fract().is_zero())
        .and_then(|qty| qty.to_u32())
        .ok_or_else(|| invalid(index, "quantity", value))
}

fn discount_kind(index: usize, raw: &Value) -> DiscountKind {
    match lookup_str(raw, DISCOUNT_KIND_KEYS).map(str::to_lowercase).as_deref() {
        None => DiscountKind::default(),
        Some("percentage") | Some("percent") | Some("%") => DiscountKind::Percentage,
        Some("fixed") | Some("flat") | Some("amount") => DiscountKind::Fixed,
        Some(other) => {
            warn!(line = index, discount_type = other, "Unknown discount type, using fixed");
            DiscountKind::Fixed
        }
    }
}

fn tax_definition(index: usize, raw: &Value) -> Result<TaxDefinition, MappingError> {
    let name = match lookup_str(raw, TAX_NAME_KEYS) {
        Some(name) => name.to_string(),
        None => {
            warn!(line = index, "Tax without a name, labelling it 'Tax'");
            "Tax".to_string()
        }
    };

    let kind = match lookup_str(raw, TAX_KIND_KEYS).map(str::to_lowercase).as_deref() {
        Some("inclusive") => TaxKind::Inclusive,
        Some("exclusive") | None => TaxKind::Exclusive,
        Some(other) => {
            warn!(line = index, tax = %name, tax_type = other, "Unknown tax type, using exclusive");
            TaxKind::Exclusive
        }
    };

    let value_type = match lookup_str(raw, TAX_VALUE_TYPE_KEYS)
        .map(str::to_lowercase)
        .as_deref()
    {
        Some("percentage") | Some("percent") | None => TaxValueType::Percentage,
        Some("fixed") | Some("flat") => TaxValueType::Fixed,
        Some(other) => {
            warn!(line = index, tax = %name, value_type = other, "Unknown tax value type, using percentage");
            TaxValueType::Percentage
        }
    };

    let value = required_decimal(raw, TAX_VALUE_KEYS, index, "tax value")?;

    Ok(TaxDefinition {
        name,
        kind,
        value_type,
        value,
    })
}

// =============================================================================
// Lookup Helpers
// =============================================================================

/// Resolves a dotted path such as `product._id`.
fn path<'a>(value: &'a Value, dotted: &str) -> Option<&'a Value> {
    dotted
        .split('.')
        .try_fold(value, |current, segment| current.get(segment))
}

/// First key in `keys` present and non-null.
fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| path(value, key))
        .find(|found| !found.is_null())
}

fn lookup_str<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| path(value, key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a JSON number or numeric string as a decimal.
fn to_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };

    text.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn required_decimal(
    raw: &Value,
    keys: &[&str],
    index: usize,
    field: &str,
) -> Result<Decimal, MappingError> {
    let value = lookup(raw, keys).ok_or_else(|| missing(index, field))?;
    to_decimal(value).ok_or_else(|| invalid(index, field, value))
}

/// Order-level amount; absent means zero.
fn optional_money(document: &Value, keys: &[&str], field: &str) -> Result<Money, MappingError> {
    match lookup(document, keys) {
        Some(value) => to_decimal(value)
            .map(Money::new)
            .ok_or_else(|| MappingError::InvalidOrderField {
                field: field.to_string(),
                reason: format!("cannot read {} as a number", value),
            }),
        None => Ok(Money::zero()),
    }
}

fn missing(index: usize, field: &str) -> MappingError {
    MappingError::MissingField {
        index,
        field: field.to_string(),
    }
}

fn invalid(index: usize, field: &str, value: &Value) -> MappingError {
    MappingError::InvalidField {
        index,
        field: field.to_string(),
        reason: format!("cannot read {} as a number", value),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
