//! # Commands
//!
//! One module per form the quote tool serves.
//!
//! ```text
//! commands/
//! ├── mod.rs       ◄─── document loading
//! ├── sale.rs      ◄─── sales form: recompute + settle tenders
//! └── purchase.rs  ◄─── purchase-order form: order totals
//! ```
//!
//! Commands take an already-parsed document so they can be exercised
//! without touching the filesystem.

pub mod purchase;
pub mod sale;

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, AppResult, ErrorCode};

pub use purchase::quote_purchase_order;
pub use sale::quote_sale;

/// Reads and parses a persisted JSON document.
pub fn read_document(path: &Path) -> AppResult<Value> {
    debug!(path = %path.display(), "Reading document");

    let raw = std::fs::read_to_string(path).map_err(|err| {
        AppError::new(
            ErrorCode::IoError,
            format!("Cannot read {}: {}", path.display(), err),
        )
    })?;

    Ok(serde_json::from_str(&raw)?)
}
