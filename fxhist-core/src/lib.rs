//! fxhist core — bulk extraction of terminal price history to CSV.
//!
//! This crate contains:
//! - Domain types (bars, timeframes, work items, credentials)
//! - The `TerminalDataSource` trait and its HTTP bridge implementation
//! - Normalization of raw terminal rates into OHLCV bars
//! - CSV persistence with atomic per-file writes
//! - The `Extractor` run loop with per-item failure isolation

pub mod config;
pub mod data;
pub mod domain;

pub use config::{BridgeConfig, ConfigError, ExtractionConfig};
pub use data::{
    BridgeClient, ExtractError, ExtractionProgress, Extractor, RunSummary, StdoutProgress,
    TerminalDataSource,
};
pub use domain::{Bar, Credentials, Timeframe, WorkItem};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: data crossing the data-source boundary is Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::WorkItem>();
        require_sync::<domain::WorkItem>();
        require_send::<domain::Credentials>();
        require_sync::<domain::Credentials>();
        require_send::<domain::HistoryRange>();
        require_sync::<domain::HistoryRange>();
        require_send::<data::RawRate>();
        require_sync::<data::RawRate>();
        require_send::<data::ExtractError>();
        require_sync::<data::ExtractError>();

        require_send::<data::BridgeClient>();
        require_sync::<data::BridgeClient>();
    }

    /// The extractor only depends on the trait, never on the bridge.
    #[test]
    fn extractor_accepts_any_terminal_data_source() {
        fn _check_builds<'a>(
            source: &'a dyn TerminalDataSource,
            progress: &'a dyn ExtractionProgress,
        ) -> Extractor<'a> {
            Extractor::new(source, ExtractionConfig::default(), progress)
        }
    }
}
