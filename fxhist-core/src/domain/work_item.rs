//! Work items and the run's history window.

use super::timeframe::Timeframe;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// One (symbol, timeframe) extraction unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem {
    pub symbol: String,
    pub timeframe: Timeframe,
}

impl WorkItem {
    pub fn new(symbol: impl Into<String>, timeframe: Timeframe) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
        }
    }

    /// Output file name: `{SYMBOL}_{TIMEFRAME}_data.csv`.
    pub fn file_name(&self) -> String {
        format!("{}_{}_data.csv", self.symbol, self.timeframe.name())
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.symbol, self.timeframe)
    }
}

/// Symbols outer, timeframes inner.
pub fn cross_product(symbols: &[String], timeframes: &[Timeframe]) -> Vec<WorkItem> {
    symbols
        .iter()
        .flat_map(|symbol| {
            timeframes
                .iter()
                .map(move |&timeframe| WorkItem::new(symbol.clone(), timeframe))
        })
        .collect()
}

/// Closed-open request window `[from, to)` shared by every work item of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryRange {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl HistoryRange {
    /// The `days` preceding `now`.
    pub fn trailing(now: DateTime<Utc>, days: i64) -> Self {
        Self {
            from: now - Duration::days(days),
            to: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_follows_symbol_timeframe_layout() {
        let item = WorkItem::new("EURUSD", Timeframe::M15);
        assert_eq!(item.file_name(), "EURUSD_M15_data.csv");
    }

    #[test]
    fn cross_product_is_symbol_major() {
        let symbols = vec!["GBPUSD".to_string(), "EURUSD".to_string()];
        let items = cross_product(&symbols, &[Timeframe::M5, Timeframe::D1]);
        let labels: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        assert_eq!(
            labels,
            vec!["GBPUSD - M5", "GBPUSD - D1", "EURUSD - M5", "EURUSD - D1"]
        );
    }

    #[test]
    fn trailing_range_spans_requested_days() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let range = HistoryRange::trailing(now, 3650);
        assert_eq!(range.to, now);
        assert_eq!(range.from, Utc.with_ymd_and_hms(2016, 10, 19, 12, 0, 0).unwrap());
        assert!(range.from < range.to);
    }
}
