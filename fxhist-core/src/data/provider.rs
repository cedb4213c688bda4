//! Terminal data-source trait and its wire-level record types.
//!
//! The TerminalDataSource trait is the narrow surface the extractor needs from
//! a trading terminal: session init, symbol lookup/selection, ranged history
//! queries, last-error introspection and shutdown. The HTTP bridge client
//! implements it for real runs; tests plug in in-memory doubles.

use crate::domain::{Credentials, Timeframe};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One raw rate record as the terminal returns it (before normalization).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRate {
    /// Bar open time, seconds since the Unix epoch.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub tick_volume: u64,
    #[serde(default)]
    pub spread: i32,
    #[serde(default)]
    pub real_volume: u64,
}

/// Subset of the terminal's symbol description that we log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub digits: u32,
    #[serde(default)]
    pub visible: bool,
}

/// The terminal's `(code, message)` diagnostic for the most recent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    pub code: i32,
    pub message: String,
}

impl LastError {
    /// Generic client-side failure, used when the terminal could not be asked.
    pub const INTERNAL_FAIL: i32 = -10000;

    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, '{}')", self.code, self.message)
    }
}

impl From<&TerminalError> for LastError {
    fn from(err: &TerminalError) -> Self {
        LastError::new(LastError::INTERNAL_FAIL, err.to_string())
    }
}

/// Transport-level failures talking to the terminal.
#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("terminal unreachable: {0}")]
    Unreachable(String),

    #[error("unexpected terminal response: {0}")]
    Protocol(String),
}

/// Narrow interface over a running trading terminal.
///
/// All calls are blocking. Boolean results mirror the terminal's own API:
/// `false` means the terminal refused the request and `last_error` explains
/// why; `Err` means the terminal could not be asked at all.
pub trait TerminalDataSource: Send + Sync {
    /// Human-readable name of this data source.
    fn name(&self) -> &str;

    /// Open and authorize a terminal session.
    fn initialize(&self, credentials: &Credentials) -> Result<bool, TerminalError>;

    /// Look a symbol up; `None` when the terminal does not know it.
    fn symbol_info(&self, symbol: &str) -> Result<Option<SymbolInfo>, TerminalError>;

    /// Add a symbol to (or remove it from) the terminal's active set.
    fn symbol_select(&self, symbol: &str, enable: bool) -> Result<bool, TerminalError>;

    /// Bars opened within `[from, to)`. `None` is the terminal's "no data".
    fn copy_rates_range(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Option<Vec<RawRate>>, TerminalError>;

    /// Diagnostic for the most recent call.
    fn last_error(&self) -> LastError;

    /// Close the session.
    fn shutdown(&self) -> Result<(), TerminalError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_error_displays_as_code_message_pair() {
        let err = LastError::new(-6, "Terminal: Authorization failed");
        assert_eq!(err.to_string(), "(-6, 'Terminal: Authorization failed')");
    }

    #[test]
    fn transport_error_converts_to_internal_fail() {
        let err = TerminalError::Unreachable("connection refused".into());
        let last = LastError::from(&err);
        assert_eq!(last.code, LastError::INTERNAL_FAIL);
        assert!(last.message.contains("connection refused"));
    }

    #[test]
    fn raw_rate_tolerates_missing_optional_fields() {
        let json = r#"{"time":1704067200,"open":1.1,"high":1.2,"low":1.0,"close":1.15,"tick_volume":42}"#;
        let rate: RawRate = serde_json::from_str(json).unwrap();
        assert_eq!(rate.tick_volume, 42);
        assert_eq!(rate.spread, 0);
        assert_eq!(rate.real_volume, 0);
    }
}
