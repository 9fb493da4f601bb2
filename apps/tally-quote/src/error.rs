//! # Application Error Type
//!
//! Unified error type for every command of the quote tool.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally POS                              │
//! │                                                                         │
//! │  config::load ──── ConfigError ────┐                                    │
//! │  read_document ─── io / serde ─────┤                                    │
//! │  mapping ───────── MappingError ───┼──► AppError { code, message }      │
//! │  tally-core ────── CoreError ──────┘            │                       │
//! │                                                 ▼                       │
//! │                          stderr: {"code":"CART_ERROR","message":...}    │
//! │                          exit status 1                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors are serializable so the front end receives both a machine-readable
//! `code` and a human-readable `message`.

use serde::Serialize;
use tally_core::CoreError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::mapping::MappingError;

/// Error returned from every command.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "quantity must be between 1 and 999"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{code:?}: {message}")]
pub struct AppError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Tax configuration cannot be priced
    PricingError,

    /// Cart operation failed
    CartError,

    /// Tender rejected
    PaymentError,

    /// Persisted document has an unusable shape
    MappingError,

    /// Configuration could not be loaded
    ConfigError,

    /// Input file could not be read
    IoError,

    /// Anything else
    Internal,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        AppError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::InvalidTaxConfiguration { .. } => ErrorCode::PricingError,
            CoreError::LineNotFound(_)
            | CoreError::CartTooLarge { .. }
            | CoreError::QuantityTooLarge { .. } => ErrorCode::CartError,
            CoreError::InvalidPaymentAmount { .. } => ErrorCode::PaymentError,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        AppError::new(code, err.to_string())
    }
}

impl From<MappingError> for AppError {
    fn from(err: MappingError) -> Self {
        AppError::new(ErrorCode::MappingError, err.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::new(ErrorCode::IoError, err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        // Syntax errors come from the input document; anything else is ours
        if err.is_syntax() || err.is_eof() || err.is_data() {
            AppError::new(ErrorCode::MappingError, format!("Invalid JSON: {}", err))
        } else {
            tracing::error!("JSON serialization failed: {}", err);
            AppError::internal("Failed to serialize output")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tally_core::ValidationError;

    #[test]
    fn test_core_error_codes() {
        let cases = [
            (
                CoreError::InvalidTaxConfiguration {
                    total_rate: Decimal::from(-100),
                },
                ErrorCode::PricingError,
            ),
            (CoreError::LineNotFound("p-1".into()), ErrorCode::CartError),
            (CoreError::CartTooLarge { max: 100 }, ErrorCode::CartError),
            (
                CoreError::InvalidPaymentAmount {
                    reason: "zero".into(),
                },
                ErrorCode::PaymentError,
            ),
            (
                CoreError::Validation(ValidationError::Required {
                    field: "name".into(),
                }),
                ErrorCode::ValidationError,
            ),
        ];

        for (err, code) in cases {
            assert_eq!(AppError::from(err).code, code);
        }
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = AppError::from(CoreError::LineNotFound("p-9".into()));
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "CART_ERROR");
        assert!(json["message"].as_str().unwrap().contains("p-9"));
    }

    #[test]
    fn test_bad_json_is_a_mapping_error() {
        let err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        assert_eq!(AppError::from(err).code, ErrorCode::MappingError);
    }
}
