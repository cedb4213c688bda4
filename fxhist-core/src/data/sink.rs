//! CSV output directory.
//!
//! Layout: `{output_dir}/{SYMBOL}_{TIMEFRAME}_data.csv`
//!
//! - Header `time,open,high,low,close,volume`, one row per bar
//! - Files are replaced wholesale on every run, never merged
//! - Atomic writes (write to .tmp, rename into place)
//! - The directory is created lazily, at most once per sink (one sink per run)

use crate::domain::{Bar, WorkItem};
use std::cell::Cell;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Column header of every output file.
pub const CSV_HEADER: [&str; 6] = ["time", "open", "high", "low", "close", "volume"];

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("failed to move {} into place: {source}", path.display())]
    Rename { path: PathBuf, source: io::Error },
}

/// Writes one CSV file per work item under a single output directory.
#[derive(Debug)]
pub struct CsvSink {
    output_dir: PathBuf,
    dir_ready: Cell<bool>,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dir_ready: Cell::new(false),
        }
    }

    /// Root directory of the output.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Final path of the file for a work item.
    pub fn path_for(&self, item: &WorkItem) -> PathBuf {
        self.output_dir.join(item.file_name())
    }

    /// Make sure the output directory exists.
    ///
    /// Returns `true` only on the call that actually created it.
    pub fn ensure_dir(&self) -> Result<bool, PersistError> {
        if self.dir_ready.get() {
            return Ok(false);
        }
        let created = !self.output_dir.is_dir();
        if created {
            fs::create_dir_all(&self.output_dir).map_err(|source| PersistError::CreateDir {
                path: self.output_dir.clone(),
                source,
            })?;
            log::debug!("created output directory {}", self.output_dir.display());
        }
        self.dir_ready.set(true);
        Ok(created)
    }

    /// Write a series, replacing any previous file for the same work item.
    pub fn write(&self, item: &WorkItem, bars: &[Bar]) -> Result<PathBuf, PersistError> {
        self.ensure_dir()?;

        let path = self.path_for(item);
        let tmp_path = path.with_extension("csv.tmp");

        let file = fs::File::create(&tmp_path).map_err(|source| PersistError::Csv {
            path: tmp_path.clone(),
            source: source.into(),
        })?;
        if let Err(source) = write_bars(file, bars) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PersistError::Csv {
                path: tmp_path,
                source,
            });
        }

        fs::rename(&tmp_path, &path).map_err(|source| {
            let _ = fs::remove_file(&tmp_path);
            PersistError::Rename {
                path: path.clone(),
                source,
            }
        })?;

        log::debug!("wrote {} rows to {}", bars.len(), path.display());
        Ok(path)
    }
}

/// Serialize bars as CSV (header included) into any writer.
pub fn write_bars<W: Write>(writer: W, bars: &[Bar]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for bar in bars {
        wtr.write_record([
            bar.formatted_time(),
            format_price(bar.open),
            format_price(bar.high),
            format_price(bar.low),
            format_price(bar.close),
            bar.volume.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Shortest round-trip repr, always with a decimal point (`150.0`, not `150`).
fn format_price(value: f64) -> String {
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timeframe;
    use chrono::{TimeZone, Utc};

    fn bars() -> Vec<Bar> {
        vec![
            Bar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                open: 1.10427,
                high: 1.10435,
                low: 1.10401,
                close: 1.1041,
                volume: 112,
            },
            Bar {
                timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 0, 5, 0).unwrap(),
                open: 150.0,
                high: 150.25,
                low: 149.5,
                close: 150.0,
                volume: 0,
            },
        ]
    }

    #[test]
    fn renders_header_and_rows() {
        let mut buf = Vec::new();
        write_bars(&mut buf, &bars()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "time,open,high,low,close,volume");
        assert_eq!(lines[1], "2024-01-02 00:00:00,1.10427,1.10435,1.10401,1.1041,112");
        assert_eq!(lines[2], "2024-01-02 00:05:00,150.0,150.25,149.5,150.0,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_series_is_header_only() {
        let mut buf = Vec::new();
        write_bars(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "time,open,high,low,close,volume\n");
    }

    proptest::proptest! {
        #[test]
        fn one_row_per_bar_in_input_order(
            gaps in proptest::collection::vec(60i64..604_800, 0..100),
        ) {
            let mut ts = Utc.with_ymd_and_hms(2016, 1, 4, 0, 0, 0).unwrap();
            let series: Vec<Bar> = gaps
                .iter()
                .map(|gap| {
                    ts += chrono::Duration::seconds(*gap);
                    Bar { timestamp: ts, open: 1.0, high: 1.5, low: 0.5, close: 1.25, volume: 7 }
                })
                .collect();

            let mut buf = Vec::new();
            write_bars(&mut buf, &series).unwrap();
            let text = String::from_utf8(buf).unwrap();
            let rows: Vec<&str> = text.lines().skip(1).collect();

            proptest::prop_assert_eq!(rows.len(), series.len());
            for (row, bar) in rows.iter().zip(&series) {
                proptest::prop_assert!(row.starts_with(&bar.formatted_time()));
            }
        }
    }

    #[test]
    fn ensure_dir_creates_once() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path().join("mt5_historical_data"));
        assert!(sink.ensure_dir().unwrap());
        assert!(!sink.ensure_dir().unwrap());
        assert!(sink.output_dir().is_dir());
    }

    #[test]
    fn ensure_dir_accepts_existing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path());
        assert!(!sink.ensure_dir().unwrap());
    }

    #[test]
    fn write_overwrites_previous_file_and_leaves_no_temp() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(tmp.path().join("out"));
        let item = WorkItem::new("USDCHF", Timeframe::H4);

        let path = sink.write(&item, &bars()).unwrap();
        assert_eq!(path, tmp.path().join("out").join("USDCHF_H4_data.csv"));

        let path = sink.write(&item, &bars()[..1]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);

        let leftovers: Vec<_> = fs::read_dir(tmp.path().join("out"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
