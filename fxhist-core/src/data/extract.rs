//! Extraction orchestrator — authenticate, walk symbols × timeframes, fetch,
//! normalize, write, disconnect.
//!
//! Only a failed authentication aborts the run. Every other failure is
//! confined to its symbol or work item and recorded in the `RunSummary`.

use super::provider::{LastError, SymbolInfo, TerminalDataSource};
use super::session::Session;
use super::sink::{CsvSink, PersistError};
use crate::config::ExtractionConfig;
use crate::domain::{Credentials, HistoryRange, WorkItem};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can go wrong during a run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("initialize() failed, error code = {diagnostic}")]
    Auth { diagnostic: LastError },

    #[error("symbol {symbol} not found")]
    SymbolUnavailable { symbol: String },

    #[error("failed to select symbol {symbol}: {diagnostic}")]
    SelectionFailure {
        symbol: String,
        diagnostic: LastError,
    },

    #[error("no data obtained for {item}: {diagnostic}")]
    EmptyResult { item: WorkItem, diagnostic: LastError },

    #[error("error while fetching/processing {item}: {detail}")]
    FetchOrConvert { item: WorkItem, detail: String },

    #[error("failed to save {item}: {source}")]
    Persist {
        item: WorkItem,
        source: PersistError,
    },
}

impl ExtractError {
    /// True for the one error that ends a run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ExtractError::Auth { .. })
    }
}

/// What happened to one work item.
#[derive(Debug)]
pub enum ItemOutcome {
    /// File written with `rows` bars.
    Written { path: PathBuf, rows: usize },
    /// Nothing to write; the terminal had no bars for the range.
    Skipped(ExtractError),
    /// Fetch, conversion or write went wrong.
    Failed(ExtractError),
}

impl ItemOutcome {
    fn from_error(err: ExtractError) -> Self {
        match err {
            ExtractError::EmptyResult { .. } => ItemOutcome::Skipped(err),
            _ => ItemOutcome::Failed(err),
        }
    }
}

#[derive(Debug)]
pub struct ItemReport {
    pub item: WorkItem,
    pub outcome: ItemOutcome,
}

/// Result of a completed (possibly partially failed) run.
#[derive(Debug)]
pub struct RunSummary {
    /// Work items in the full symbols × timeframes plan.
    pub planned: usize,
    pub range: HistoryRange,
    pub output_dir: PathBuf,
    pub skipped_symbols: Vec<(String, ExtractError)>,
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.items.len()
    }

    pub fn written(&self) -> usize {
        self.items
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Written { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items
            .iter()
            .filter(|r| matches!(r.outcome, ItemOutcome::Failed(_)))
            .count()
    }

    /// Files written this run, in work-item order.
    pub fn written_paths(&self) -> Vec<&Path> {
        self.items
            .iter()
            .filter_map(|r| match &r.outcome {
                ItemOutcome::Written { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }
}

/// Progress callbacks for a run.
pub trait ExtractionProgress {
    fn on_connecting(&self, source: &str);
    fn on_connected(&self, source: &str);
    fn on_symbol_start(&self, symbol: &str, index: usize, total: usize);
    fn on_symbol_ready(&self, info: &SymbolInfo);
    fn on_symbol_skipped(&self, symbol: &str, error: &ExtractError);
    fn on_output_dir_created(&self, path: &Path);
    fn on_item_start(&self, item: &WorkItem);
    fn on_item_complete(&self, item: &WorkItem, outcome: &ItemOutcome);
    fn on_disconnected(&self);
    fn on_run_complete(&self, summary: &RunSummary);
}

/// Console narration on stdout.
pub struct StdoutProgress;

impl ExtractionProgress for StdoutProgress {
    fn on_connecting(&self, source: &str) {
        println!("\nConnecting to {source}...");
    }

    fn on_connected(&self, source: &str) {
        println!("Successfully connected to {source}.");
    }

    fn on_symbol_start(&self, symbol: &str, index: usize, total: usize) {
        println!("\n[{}/{}] Processing symbol: {symbol}", index + 1, total);
    }

    fn on_symbol_ready(&self, info: &SymbolInfo) {
        println!("Symbol {} selected.", info.name);
    }

    fn on_symbol_skipped(&self, _symbol: &str, error: &ExtractError) {
        println!("Skipping: {error}");
    }

    fn on_output_dir_created(&self, path: &Path) {
        println!("  Created directory: {}", path.display());
    }

    fn on_item_start(&self, item: &WorkItem) {
        println!("  Fetching data for timeframe: {}...", item.timeframe);
    }

    fn on_item_complete(&self, _item: &WorkItem, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Written { path, rows } => {
                println!("    Data saved to {} ({rows} rows)", path.display())
            }
            ItemOutcome::Skipped(e) => println!("    Skipped: {e}"),
            ItemOutcome::Failed(e) => println!("    FAIL: {e}"),
        }
    }

    fn on_disconnected(&self) {
        println!("\nTerminal connection closed.");
    }

    fn on_run_complete(&self, summary: &RunSummary) {
        println!(
            "Extraction complete: {} written, {} skipped, {} failed ({} of {} work items attempted)",
            summary.written(),
            summary.skipped(),
            summary.failed(),
            summary.attempted(),
            summary.planned,
        );
        println!(
            "All requested data has been attempted to be downloaded to the '{}' folder.",
            summary.output_dir.display()
        );
    }
}

/// Drives extraction runs against a terminal data source.
pub struct Extractor<'a> {
    source: &'a dyn TerminalDataSource,
    config: ExtractionConfig,
    progress: &'a dyn ExtractionProgress,
}

impl<'a> Extractor<'a> {
    pub fn new(
        source: &'a dyn TerminalDataSource,
        config: ExtractionConfig,
        progress: &'a dyn ExtractionProgress,
    ) -> Self {
        Self {
            source,
            config,
            progress,
        }
    }

    /// Run over the history window ending now.
    pub fn run(&self, credentials: &Credentials) -> Result<RunSummary, ExtractError> {
        self.run_at(credentials, Utc::now())
    }

    /// Run over the history window ending at `now`.
    pub fn run_at(
        &self,
        credentials: &Credentials,
        now: DateTime<Utc>,
    ) -> Result<RunSummary, ExtractError> {
        let range = HistoryRange::trailing(now, self.config.history_days);
        log::debug!("history range {} .. {}", range.from, range.to);

        self.progress.on_connecting(self.source.name());
        let session = Session::authenticate(self.source, credentials)?;
        self.progress.on_connected(self.source.name());

        // Fresh per run so a directory removed since the last run is recreated.
        let sink = CsvSink::new(self.config.output_dir.clone());
        let mut summary = RunSummary {
            planned: self.config.work_items().len(),
            range,
            output_dir: sink.output_dir().to_path_buf(),
            skipped_symbols: Vec::new(),
            items: Vec::new(),
        };

        let total = self.config.symbols.len();
        for (i, symbol) in self.config.symbols.iter().enumerate() {
            self.progress.on_symbol_start(symbol, i, total);

            match session.resolve_symbol(symbol) {
                Ok(info) => self.progress.on_symbol_ready(&info),
                Err(e) => {
                    log::warn!("skipping {symbol}: {e}");
                    self.progress.on_symbol_skipped(symbol, &e);
                    summary.skipped_symbols.push((symbol.clone(), e));
                    continue;
                }
            }

            for &timeframe in &self.config.timeframes {
                let item = WorkItem::new(symbol.clone(), timeframe);
                self.progress.on_item_start(&item);
                let outcome = self.extract_item(&session, &sink, &item, &range);
                self.progress.on_item_complete(&item, &outcome);
                summary.items.push(ItemReport { item, outcome });
            }
        }

        if let Err(e) = session.shutdown() {
            log::warn!("terminal shutdown failed: {e}");
        }
        self.progress.on_disconnected();
        self.progress.on_run_complete(&summary);

        Ok(summary)
    }

    /// Fetch → normalize → write for one work item.
    fn extract_item(
        &self,
        session: &Session,
        sink: &CsvSink,
        item: &WorkItem,
        range: &HistoryRange,
    ) -> ItemOutcome {
        let persist_err = |source: PersistError| ExtractError::Persist {
            item: item.clone(),
            source,
        };
        let result = session.fetch_series(item, range).and_then(|bars| {
            if sink.ensure_dir().map_err(persist_err)? {
                self.progress.on_output_dir_created(sink.output_dir());
            }
            let path = sink.write(item, &bars).map_err(persist_err)?;
            Ok((path, bars.len()))
        });

        match result {
            Ok((path, rows)) => {
                log::debug!("{item}: {rows} rows -> {}", path.display());
                ItemOutcome::Written { path, rows }
            }
            Err(e) => {
                let outcome = ItemOutcome::from_error(e);
                match &outcome {
                    ItemOutcome::Skipped(e) => log::warn!("{item}: {e}"),
                    ItemOutcome::Failed(e) => log::error!("{item}: {e}"),
                    ItemOutcome::Written { .. } => {}
                }
                outcome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timeframe;

    #[test]
    fn only_auth_is_fatal() {
        let auth = ExtractError::Auth {
            diagnostic: LastError::new(-6, "Authorization failed"),
        };
        let empty = ExtractError::EmptyResult {
            item: WorkItem::new("EURUSD", Timeframe::H1),
            diagnostic: LastError::new(1, "Success"),
        };
        assert!(auth.is_fatal());
        assert!(!empty.is_fatal());
    }

    #[test]
    fn auth_message_surfaces_terminal_code() {
        let auth = ExtractError::Auth {
            diagnostic: LastError::new(-6, "Terminal: Authorization failed"),
        };
        assert_eq!(
            auth.to_string(),
            "initialize() failed, error code = (-6, 'Terminal: Authorization failed')"
        );
    }

    #[test]
    fn empty_result_is_a_skip_everything_else_a_failure() {
        let item = WorkItem::new("USDCHF", Timeframe::M30);
        let skipped = ItemOutcome::from_error(ExtractError::EmptyResult {
            item: item.clone(),
            diagnostic: LastError::new(1, "Success"),
        });
        let failed = ItemOutcome::from_error(ExtractError::FetchOrConvert {
            item,
            detail: "timeout".into(),
        });
        assert!(matches!(skipped, ItemOutcome::Skipped(_)));
        assert!(matches!(failed, ItemOutcome::Failed(_)));
    }
}
