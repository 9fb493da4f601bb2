//! # Command Line
//!
//! ```text
//! tally-quote [--config tally.toml] sale sale.json --tender cash=100 --tender card=29.60
//! tally-quote [--config tally.toml] purchase-order po.json
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tally_core::{Money, PaymentMethod, Tender};

#[derive(Debug, Parser)]
#[command(name = "tally-quote", about = "Recompute and quote Tally POS sales and purchase orders", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Recompute a persisted sale and print its submit payload
    Sale {
        /// Sale document (JSON)
        file: PathBuf,

        /// Tender taken at checkout, as METHOD=AMOUNT (repeatable)
        #[arg(long = "tender", value_parser = parse_tender)]
        tenders: Vec<Tender>,
    },

    /// Price a persisted purchase order
    PurchaseOrder {
        /// Purchase-order document (JSON)
        file: PathBuf,
    },
}

/// Parses `METHOD=AMOUNT`, e.g. `cash=50.00`.
pub fn parse_tender(raw: &str) -> Result<Tender, String> {
    let (method, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected METHOD=AMOUNT, got '{}'", raw))?;

    let amount: Decimal = amount
        .trim()
        .parse()
        .map_err(|err| format!("invalid amount '{}': {}", amount, err))?;

    Ok(Tender {
        method: PaymentMethod::parse(method),
        amount: Money::new(amount),
    })
}
