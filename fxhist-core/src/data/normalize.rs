//! Raw terminal rates → normalized OHLCV bars.
//!
//! Keeps open/high/low/close and tick volume (renamed to `volume`), turns the
//! epoch-seconds open time into a UTC timestamp and drops everything else.
//! Record order is preserved as delivered.

use super::provider::RawRate;
use crate::domain::Bar;
use chrono::DateTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("bar time {time} at row {row} is out of range")]
    InvalidTimestamp { row: usize, time: i64 },
}

/// Normalize one raw rate.
pub fn normalize_rate(row: usize, rate: &RawRate) -> Result<Bar, NormalizeError> {
    let timestamp = DateTime::from_timestamp(rate.time, 0).ok_or(
        NormalizeError::InvalidTimestamp {
            row,
            time: rate.time,
        },
    )?;
    Ok(Bar {
        timestamp,
        open: rate.open,
        high: rate.high,
        low: rate.low,
        close: rate.close,
        volume: rate.tick_volume,
    })
}

/// Normalize a whole series; fails on the first unrepresentable timestamp.
pub fn normalize(rates: &[RawRate]) -> Result<Vec<Bar>, NormalizeError> {
    rates
        .iter()
        .enumerate()
        .map(|(row, rate)| normalize_rate(row, rate))
        .collect()
}
