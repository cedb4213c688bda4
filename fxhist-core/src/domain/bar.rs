//! Bar — the normalized OHLCV record written to disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout used in output files (`YYYY-MM-DD HH:MM:SS`, UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// OHLCV bar for a single symbol and timeframe.
///
/// `volume` is the terminal's tick volume; real (exchange) volume is not
/// reported for FX pairs and is dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Timestamp rendered the way the output files carry it.
    pub fn formatted_time(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formatted_time_has_no_offset_or_fraction() {
        let bar = Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 0).unwrap(),
            open: 1.0845,
            high: 1.0851,
            low: 1.0839,
            close: 1.0848,
            volume: 1_204,
        };
        assert_eq!(bar.formatted_time(), "2024-03-01 14:05:00");
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = Bar {
            timestamp: Utc.with_ymd_and_hms(2015, 1, 2, 0, 0, 0).unwrap(),
            open: 1.2100,
            high: 1.2150,
            low: 1.2001,
            close: 1.2003,
            volume: 88_000,
        };
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
