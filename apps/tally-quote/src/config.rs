//! # Configuration
//!
//! Store and display settings loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_STORE_NAME, TALLY_CURRENCY_CODE, TALLY_CURRENCY_SYMBOL,      │
//! │     TALLY_CURRENCY_DECIMALS, TALLY_LOG, TALLY_PRETTY                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <PATH>, or                                                │
//! │     ~/.config/tally-pos/tally.toml (Linux)                             │
//! │     ~/Library/Application Support/com.tally.pos/tally.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Downtown Branch"
//! currency_code = "INR"
//! currency_symbol = "₹"
//! currency_decimals = 2
//! log_filter = "info,tally=debug"
//! pretty = true
//! ```
//!
//! Configuration is read-only after loading, so it is passed by reference.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use tally_core::Money;
use thiserror::Error;
use tracing::debug;

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "tally.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Store name (echoed in payloads)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            store_name: "Tally POS Dev Store".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            log_filter: "info,tally=debug".to_string(),
            pretty: true,
        }
    }
}

impl QuoteConfig {
    /// Loads defaults, then the config file, then `TALLY_*` variables.
    ///
    /// An explicit `path` must exist. Without one, the platform config
    /// directory is checked and silently skipped if the file is absent.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|candidate| candidate.exists()),
        };

        let mut config = match file {
            Some(file) => Self::from_file(&file)?,
            None => QuoteConfig::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Reads a TOML file; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config file");

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("TALLY_STORE_NAME") {
            self.store_name = value;
        }

        if let Some(value) = lookup("TALLY_CURRENCY_CODE") {
            self.currency_code = value;
        }

        if let Some(value) = lookup("TALLY_CURRENCY_SYMBOL") {
            self.currency_symbol = value;
        }

        if let Some(value) = lookup("TALLY_CURRENCY_DECIMALS") {
            self.currency_decimals = value
                .parse::<u8>()
                .ok()
                .filter(|decimals| *decimals <= 4)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "TALLY_CURRENCY_DECIMALS".to_string(),
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup("TALLY_LOG") {
            self.log_filter = value;
        }

        if let Some(value) = lookup("TALLY_PRETTY") {
            self.pretty = match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "TALLY_PRETTY".to_string(),
                        value,
                    })
                }
            };
        }

        Ok(())
    }

    /// Formats an amount as a currency string.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal_macros::dec;
    /// use tally_core::Money;
    /// use tally_quote::config::QuoteConfig;
    ///
    /// let config = QuoteConfig::default();
    /// assert_eq!(config.format_currency(Money::new(dec!(1234.5))), "$1234.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let decimals = u32::from(self.currency_decimals);
        let rounded = amount
            .amount()
            .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);

        format!(
            "{}{}{:.width$}",
            if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" },
            self.currency_symbol,
            rounded.abs(),
            width = decimals as usize
        )
    }
}

/// Platform config file location.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "tally", "pos").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_format_currency() {
        let config = QuoteConfig::default();
        assert_eq!(config.format_currency(Money::new(dec!(12.34))), "$12.34");
        assert_eq!(config.format_currency(Money::new(dec!(1))), "$1.00");
        assert_eq!(config.format_currency(Money::new(dec!(0.005))), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::new(dec!(-12.34))), "-$12.34");
    }

    #[test]
    fn test_format_currency_without_decimals() {
        let config = QuoteConfig {
            currency_symbol: "¥".to_string(),
            currency_decimals: 0,
            ..QuoteConfig::default()
        };
        assert_eq!(config.format_currency(Money::new(dec!(1299.5))), "¥1300");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency_code = \"INR\"\ncurrency_symbol = \"₹\"").unwrap();

        let config = QuoteConfig::from_file(file.path()).unwrap();
        assert_eq!(config.currency_code, "INR");
        assert_eq!(config.currency_symbol, "₹");
        // Untouched keys keep defaults
        assert_eq!(config.currency_decimals, 2);
        assert_eq!(config.store_name, QuoteConfig::default().store_name);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            QuoteConfig::load(Some(missing.as_path())),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "currency_decimals = \"two\"").unwrap();
        assert!(matches!(
            QuoteConfig::from_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars = env(&[
            ("TALLY_STORE_NAME", "Harbour Road"),
            ("TALLY_CURRENCY_DECIMALS", "3"),
            ("TALLY_PRETTY", "false"),
        ]);
        let mut config = QuoteConfig::default();
        config.apply_env(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.store_name, "Harbour Road");
        assert_eq!(config.currency_decimals, 3);
        assert!(!config.pretty);
        assert_eq!(config.currency_code, "USD");
    }

    #[test]
    fn test_invalid_env_values() {
        for (key, value) in [
            ("TALLY_CURRENCY_DECIMALS", "many"),
            ("TALLY_CURRENCY_DECIMALS", "9"),
            ("TALLY_PRETTY", "sometimes"),
        ] {
            let vars = env(&[(key, value)]);
            let mut config = QuoteConfig::default();
            let err = config.apply_env(|k| vars.get(k).cloned()).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }), "{key}={value}");
        }
    }
}
