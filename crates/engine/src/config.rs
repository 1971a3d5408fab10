//! Engine configuration via `stockledger.toml`
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Embedders can also build an [`EngineConfig`] in code with the `with_*`
//! setters and skip the file entirely.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use stockledger_core::{
    StockError, StockResult, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_RESERVATION_TIMEOUT_MINUTES,
    DEFAULT_SWEEP_INTERVAL_SECS,
};

/// Config file name
pub const CONFIG_FILE_NAME: &str = "stockledger.toml";

/// Engine configuration loaded from `stockledger.toml`.
///
/// # Example
///
/// ```toml
/// default_reservation_timeout_minutes = 15
/// low_stock_threshold = 10
/// sweep_interval_secs = 60
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lease length used when a reserve call passes no timeout.
    #[serde(default = "default_timeout_minutes")]
    pub default_reservation_timeout_minutes: u64,
    /// Actual-stock level at or below which a product is flagged as low.
    #[serde(default = "default_low_stock_threshold")]
    pub low_stock_threshold: i64,
    /// How often a [`ReservationSweeper`](crate::ReservationSweeper) sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_timeout_minutes() -> u64 {
    DEFAULT_RESERVATION_TIMEOUT_MINUTES
}

fn default_low_stock_threshold() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_sweep_interval_secs() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_reservation_timeout_minutes: default_timeout_minutes(),
            low_stock_threshold: default_low_stock_threshold(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl EngineConfig {
    /// Set the default lease length in minutes
    pub fn with_default_timeout_minutes(mut self, minutes: u64) -> Self {
        self.default_reservation_timeout_minutes = minutes;
        self
    }

    /// Set the low-stock threshold
    pub fn with_low_stock_threshold(mut self, threshold: i64) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Set the sweeper interval in seconds
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    /// Default lease as a `Duration`
    pub fn default_reservation_timeout(&self) -> Duration {
        Duration::from_secs(self.default_reservation_timeout_minutes.saturating_mul(60))
    }

    /// Sweeper interval as a `Duration`
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `Config` if the default timeout or sweep interval is zero, or
    /// the low-stock threshold is negative.
    pub fn validate(&self) -> StockResult<()> {
        if self.default_reservation_timeout_minutes == 0 {
            return Err(StockError::config(
                "default_reservation_timeout_minutes must be at least 1",
            ));
        }
        if self.low_stock_threshold < 0 {
            return Err(StockError::config(format!(
                "low_stock_threshold must not be negative, got {}",
                self.low_stock_threshold
            )));
        }
        if self.sweep_interval_secs == 0 {
            return Err(StockError::config("sweep_interval_secs must be at least 1"));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# StockLedger engine configuration
#
# Lease length (minutes) for reservations created without an explicit timeout.
default_reservation_timeout_minutes = 15

# A product whose actual stock is at or below this level is flagged as low.
low_stock_threshold = 10

# Interval (seconds) between sweeps when a ReservationSweeper is running.
sweep_interval_secs = 60
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML or fails validation.
    pub fn from_toml_str(content: &str) -> StockResult<Self> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| StockError::config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> StockResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StockError::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| match e {
            StockError::Config { reason } => {
                StockError::config(format!("{} ({})", reason, path.display()))
            }
            other => other,
        })?;
        debug!(target: "stockledger::config", path = %path.display(), "Loaded engine config");
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the file cannot be written.
    pub fn write_default_if_missing(path: &Path) -> StockResult<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                StockError::config(format!(
                    "Failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    ///
    /// # Errors
    ///
    /// Returns `Config` if serialization or the write fails.
    pub fn write_to_file(&self, path: &Path) -> StockResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| StockError::config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            StockError::config(format!(
                "Failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
