//! Extraction and bridge configuration.
//!
//! The extraction set (symbols, timeframes, span, output directory) is fixed;
//! `ExtractionConfig::default()` is the only one the binary builds. Bridge
//! connection settings can come from a TOML file.

use crate::domain::{cross_product, Timeframe, WorkItem};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Currency pairs extracted on every run.
pub const DEFAULT_SYMBOLS: [&str; 4] = ["GBPUSD", "EURUSD", "USDCHF", "USDJPY"];

/// Ten years of history, counted as 365-day years.
pub const DEFAULT_HISTORY_DAYS: i64 = 10 * 365;

/// Output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "mt5_historical_data";

/// Default bridge address.
pub const DEFAULT_BRIDGE_ENDPOINT: &str = "http://127.0.0.1:8228";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse bridge config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What to extract and where to put it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    pub symbols: Vec<String>,
    pub timeframes: Vec<Timeframe>,
    pub history_days: i64,
    pub output_dir: PathBuf,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            timeframes: Timeframe::ALL.to_vec(),
            history_days: DEFAULT_HISTORY_DAYS,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl ExtractionConfig {
    /// Every planned work item, symbol-major.
    pub fn work_items(&self) -> Vec<WorkItem> {
        cross_product(&self.symbols, &self.timeframes)
    }
}

/// How to reach the terminal bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub endpoint: String,
    /// Per-request timeout. History queries over ten years of M5 bars are slow.
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_BRIDGE_ENDPOINT.to_string(),
            timeout_secs: 300,
        }
    }
}

impl BridgeConfig {
    /// Load bridge settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse bridge settings from a TOML string; missing keys keep defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
