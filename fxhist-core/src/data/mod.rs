//! Terminal access, normalization, persistence and the extraction run

pub mod bridge;
pub mod extract;
pub mod normalize;
pub mod provider;
pub mod session;
pub mod sink;

pub use bridge::BridgeClient;
pub use extract::{
    ExtractError, ExtractionProgress, Extractor, ItemOutcome, ItemReport, RunSummary,
    StdoutProgress,
};
pub use normalize::{normalize, NormalizeError};
pub use provider::{LastError, RawRate, SymbolInfo, TerminalDataSource, TerminalError};
pub use session::Session;
pub use sink::{write_bars, CsvSink, PersistError, CSV_HEADER};
