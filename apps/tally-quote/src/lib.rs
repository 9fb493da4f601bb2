//! # tally-quote: Quote & Submit Tool for Tally POS
//!
//! Recomputes persisted sales and purchase orders with `tally-core` and
//! prints the JSON payload the forms submit to the backend.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Tally Quote Startup                                  │
//! │                                                                         │
//! │  1. Parse arguments (clap)                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  2. Load configuration (defaults → tally.toml → TALLY_* env)            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  3. Initialize tracing (stderr)                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  4. Read document ──► mapping ──► tally-core ──► payload                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  5. Print JSON to stdout                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod mapping;
pub mod payload;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::QuoteConfig;
use crate::error::AppResult;

/// Runs one command and returns the JSON to print.
pub fn run(cli: Cli) -> AppResult<String> {
    let config = QuoteConfig::load(cli.config.as_deref())?;
    init_tracing(&config.log_filter);

    info!(store = %config.store_name, currency = %config.currency_code, "Tally quote starting");

    match cli.command {
        Command::Sale { file, tenders } => {
            let document = commands::read_document(&file)?;
            let payload = commands::quote_sale(&document, &tenders, &config)?;
            render(&payload, config.pretty)
        }
        Command::PurchaseOrder { file } => {
            let document = commands::read_document(&file)?;
            let payload = commands::quote_purchase_order(&document, &config)?;
            render(&payload, config.pretty)
        }
    }
}

fn render<T: Serialize>(value: &T, pretty: bool) -> AppResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG` takes precedence when set
/// - Otherwise `default_filter` (`log_filter` from config, `TALLY_LOG`)
///
/// Logs go to stderr; stdout carries only the JSON payload.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A subscriber may already be installed (tests, embedding callers)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_run_sale_end_to_end() {
        let config = write_temp("store_name = \"Harbour Road\"\npretty = false\n");
        let sale = write_temp(
            r#"{"items":[{"product_id":"p-1","name":"Tea","price":"4.30","taxes":[{"name":"VAT","value":5}]}]}"#,
        );

        let cli = Cli {
            config: Some(config.path().to_path_buf()),
            command: Command::Sale {
                file: sale.path().to_path_buf(),
                tenders: vec![],
            },
        };

        let output = run(cli).unwrap();
        assert!(!output.contains('\n'));

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["storeName"], "Harbour Road");
        assert_eq!(json["billing"]["grandTotalDisplay"], "$5.00");
    }

    #[test]
    fn test_run_reports_missing_document() {
        let config = write_temp("");
        let cli = Cli {
            config: Some(config.path().to_path_buf()),
            command: Command::PurchaseOrder {
                file: PathBuf::from("/definitely/not/here.json"),
            },
        };

        let err = run(cli).unwrap_err();
        assert_eq!(err.code, error::ErrorCode::IoError);
    }
}
