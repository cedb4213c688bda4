//! Bar aggregation intervals understood by the terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fixed bar interval.
///
/// The terminal identifies intervals by numeric code: minute timeframes are
/// the minute count, hourly ones set bit 14 (`0x4000 | hours`) and daily is
/// `0x4000 | 24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    M5,
    M15,
    M30,
    H1,
    H4,
    D1,
}

impl Timeframe {
    /// Every timeframe, shortest first.
    pub const ALL: [Timeframe; 6] = [
        Timeframe::M5,
        Timeframe::M15,
        Timeframe::M30,
        Timeframe::H1,
        Timeframe::H4,
        Timeframe::D1,
    ];

    /// Short name used in file names and console output (`"H1"`).
    pub fn name(self) -> &'static str {
        match self {
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }

    /// Numeric timeframe code sent to the terminal.
    pub fn terminal_code(self) -> u32 {
        const HOURLY: u32 = 0x4000;
        match self {
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => HOURLY | 1,
            Timeframe::H4 => HOURLY | 4,
            Timeframe::D1 => HOURLY | 24,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_codes_match_platform_constants() {
        let codes: Vec<u32> = Timeframe::ALL.iter().map(|tf| tf.terminal_code()).collect();
        assert_eq!(codes, vec![5, 15, 30, 16385, 16388, 16408]);
    }

    #[test]
    fn display_uses_short_name() {
        assert_eq!(Timeframe::H4.to_string(), "H4");
        assert_eq!(format!("{}", Timeframe::D1), "D1");
    }
}
