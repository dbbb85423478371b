//! Synchronous CSV reader with iterator interface
//!
//! Provides a streaming iterator over operation records from a CSV file.
//! Delegates CSV format concerns to the csv_format module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding Result<OperationRecord, String>
//! for each CSV row:
//!
//! ```no_run
//! use wallet_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("operations.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(record) => println!("Applying operation: {:?}", record),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual record parsing errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::OperationRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous CSV reader
///
/// Provides an iterator interface over operation records.
/// Maintains streaming behavior with constant memory usage.
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// The CSV reader is configured to:
    /// - Trim whitespace from all fields
    /// - Allow flexible field counts (trailing optional columns may be omitted)
    /// - Use an 8KB buffer for efficient I/O
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<OperationRecord, String>;

    /// Get the next operation record from the CSV file
    ///
    /// # Returns
    ///
    /// * `Some(Ok(OperationRecord))` - Successfully parsed record
    /// * `Some(Err(String))` - Parse or conversion error with line number
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();

        let result = deserializer.next()?;
        self.line_num += 1;
        // +1 for the header row
        let line = self.line_num + 1;

        Some(match result {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationType;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "type,account,counterparty,amount,name,contact,description\n";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_iterates_records_in_order() {
        let csv_content = format!(
            "{}open,alice,,,Alice Johnson,alice@example.com,\n\
             deposit,alice,,100.50,,,salary\n\
             transfer,alice,bob,30.25,,,lunch\n",
            HEADER
        );
        let file = create_temp_csv(&csv_content);

        let reader = SyncReader::new(file.path()).unwrap();
        let records: Vec<OperationRecord> = reader.map(Result::unwrap).collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].op_type, OperationType::Open);
        assert_eq!(records[0].name, "Alice Johnson");
        assert_eq!(records[1].op_type, OperationType::Deposit);
        assert_eq!(records[1].amount, Some(Decimal::new(10050, 2)));
        assert_eq!(records[2].counterparty.as_deref(), Some("bob"));
        assert_eq!(records[2].description, "lunch");
    }

    #[test]
    fn test_sync_reader_accepts_short_rows() {
        let csv_content = format!("{}deposit,alice,,5\n", HEADER);
        let file = create_temp_csv(&csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].as_ref().unwrap().amount, Some(Decimal::new(5, 0)));
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let csv_content = format!(
            "{}deposit,alice,,1,,,\ndeposit,alice,,oops,,,\n",
            HEADER
        );
        let file = create_temp_csv(&csv_content);

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_ok());
        let error = records[1].as_ref().unwrap_err();
        assert!(error.contains("Line 3"), "unexpected error: {}", error);
        assert!(error.contains("Invalid amount"));
    }

    #[test]
    fn test_sync_reader_handles_whitespace() {
        let csv_content = format!("{}  deposit , alice ,, 7.5 ,,, tip \n", HEADER);
        let file = create_temp_csv(&csv_content);

        let record = SyncReader::new(file.path())
            .unwrap()
            .next()
            .unwrap()
            .unwrap();

        assert_eq!(record.account, "alice");
        assert_eq!(record.amount, Some(Decimal::new(75, 1)));
        assert_eq!(record.description, "tip");
    }
}
