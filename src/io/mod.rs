//! I/O module
//!
//! CSV input for replaying operations against a ledger, and CSV output for
//! account balances and transaction history:
//! - `csv_format`: record conversion and output writers
//! - `sync_reader`: streaming iterator over an operation file
//! - `async_reader`: batch reader used by the concurrent replay strategy

pub mod async_reader;
pub mod csv_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{convert_csv_record, write_accounts_csv, write_history_csv, CsvRecord};
pub use sync_reader::SyncReader;
