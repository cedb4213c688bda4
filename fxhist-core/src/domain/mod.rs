//! Domain types for fxhist

pub mod bar;
pub mod credentials;
pub mod timeframe;
pub mod work_item;

pub use bar::{Bar, TIMESTAMP_FORMAT};
pub use credentials::{Credentials, CredentialsError};
pub use timeframe::Timeframe;
pub use work_item::{cross_product, HistoryRange, WorkItem};
