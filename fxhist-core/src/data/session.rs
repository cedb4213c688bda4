//! An authenticated terminal session.
//!
//! Created only by a successful `authenticate`; released by `shutdown`, or on
//! drop if the caller never got that far.

use super::extract::ExtractError;
use super::normalize::normalize;
use super::provider::{LastError, SymbolInfo, TerminalDataSource, TerminalError};
use crate::domain::{Bar, Credentials, HistoryRange, WorkItem};

pub struct Session<'a> {
    source: &'a dyn TerminalDataSource,
    open: bool,
}

impl<'a> Session<'a> {
    /// Open a session; the terminal's diagnostic is carried on failure.
    pub fn authenticate(
        source: &'a dyn TerminalDataSource,
        credentials: &Credentials,
    ) -> Result<Self, ExtractError> {
        log::debug!(
            "initializing {} for login {} on {}",
            source.name(),
            credentials.login,
            credentials.server
        );
        match source.initialize(credentials) {
            Ok(true) => Ok(Self { source, open: true }),
            Ok(false) => Err(ExtractError::Auth {
                diagnostic: source.last_error(),
            }),
            Err(e) => Err(ExtractError::Auth {
                diagnostic: LastError::from(&e),
            }),
        }
    }

    /// Check the symbol exists and enable it for history access.
    pub fn resolve_symbol(&self, symbol: &str) -> Result<SymbolInfo, ExtractError> {
        let info = match self.source.symbol_info(symbol) {
            Ok(Some(info)) => info,
            Ok(None) => {
                return Err(ExtractError::SymbolUnavailable {
                    symbol: symbol.to_string(),
                })
            }
            Err(e) => return Err(self.selection_failure(symbol, &e)),
        };

        match self.source.symbol_select(symbol, true) {
            Ok(true) => Ok(info),
            Ok(false) => Err(ExtractError::SelectionFailure {
                symbol: symbol.to_string(),
                diagnostic: self.source.last_error(),
            }),
            Err(e) => Err(self.selection_failure(symbol, &e)),
        }
    }

    fn selection_failure(&self, symbol: &str, e: &TerminalError) -> ExtractError {
        ExtractError::SelectionFailure {
            symbol: symbol.to_string(),
            diagnostic: LastError::from(e),
        }
    }

    /// Fetch and normalize one work item's bars over the run's range.
    pub fn fetch_series(
        &self,
        item: &WorkItem,
        range: &HistoryRange,
    ) -> Result<Vec<Bar>, ExtractError> {
        let rates = self
            .source
            .copy_rates_range(&item.symbol, item.timeframe, range.from, range.to)
            .map_err(|e| ExtractError::FetchOrConvert {
                item: item.clone(),
                detail: e.to_string(),
            })?;

        let rates = match rates {
            Some(rates) if !rates.is_empty() => rates,
            _ => {
                return Err(ExtractError::EmptyResult {
                    item: item.clone(),
                    diagnostic: self.source.last_error(),
                })
            }
        };

        normalize(&rates).map_err(|e| ExtractError::FetchOrConvert {
            item: item.clone(),
            detail: e.to_string(),
        })
    }

    /// Release the session.
    pub fn shutdown(mut self) -> Result<(), TerminalError> {
        self.open = false;
        self.source.shutdown()
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if self.open {
            if let Err(e) = self.source.shutdown() {
                log::warn!("terminal shutdown on drop failed: {e}");
            }
        }
    }
}
