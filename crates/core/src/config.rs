//! Configuration structures for the conversion system.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Main configuration for the conversion system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reference table configuration.
    pub reference: ReferenceConfig,
    /// Fund to account number mapping.
    pub accounts: AccountConfig,
    /// Batch processing configuration.
    pub pipeline: PipelineConfig,
    /// Position reconciliation settings.
    pub recon: ReconConfig,
}

impl Config {
    /// Parse a configuration from JSON text. Missing sections take defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.reference.cache_capacity == 0 {
            return Err(Error::config("reference.cache_capacity must be at least 1"));
        }
        if self.reference.broker_ssi_file.trim().is_empty() {
            return Err(Error::config("reference.broker_ssi_file must not be empty"));
        }
        if self.recon.portfolio.trim().is_empty() {
            return Err(Error::config("recon.portfolio must not be empty"));
        }
        Ok(())
    }
}

/// Reference table configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Directory holding reference tables.
    pub reference_dir: String,
    /// Broker SSI mapping file name, relative to `reference_dir`.
    pub broker_ssi_file: String,
    /// Number of distinct reference files kept loaded.
    pub cache_capacity: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            reference_dir: "reference".to_string(),
            broker_ssi_file: "BrokerSSI.csv".to_string(),
            cache_capacity: 3,
        }
    }
}

/// Fund code to back-office account number mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Fund code -> account number.
    pub mapping: BTreeMap<String, String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        let mapping = [
            ("60001", "CLAMC STBD"),
            ("40017-B", "666666"),
            ("40019", "12345678"),
            ("19437-A", "19437A"),
            ("19437-B", "19437B"),
        ]
        .into_iter()
        .map(|(fund, account)| (fund.to_string(), account.to_string()))
        .collect();

        Self { mapping }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of parallel workers (0 = auto).
    pub workers: u32,
    /// Abort the whole batch on the first failing group.
    pub abort_on_error: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            abort_on_error: true,
        }
    }
}

/// Position reconciliation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconConfig {
    /// Portfolio name stamped on every reconciliation record.
    pub portfolio: String,
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            portfolio: "Short Term Bond Fund".to_string(),
        }
    }
}
