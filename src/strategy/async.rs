//! Asynchronous batch replay strategy
//!
//! This module provides a multi-threaded implementation of the ReplayStrategy
//! trait. It reads operation records in batches and applies each batch across
//! worker threads with account-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncReplayStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (account partitioning + blocking workers)
//!     └── Arc<Ledger> (shared ledger)
//! ```
//!
//! # Ordering
//!
//! Batches are barriers: a batch is fully applied before the next one is read.
//! Inside a batch, records for the same primary account keep file order while
//! different accounts run concurrently.

use crate::core::Ledger;
use crate::io::async_reader::AsyncReader;
use crate::strategy::{BatchProcessor, ReplayStrategy};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
///
/// Controls how records are batched and the number of worker threads
/// used to apply each batch.
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Number of runtime worker threads, and the cap on partitions applied at once
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches, default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch replay strategy
#[derive(Debug, Clone)]
pub struct AsyncReplayStrategy {
    config: BatchConfig,
}

impl AsyncReplayStrategy {
    /// Create a new AsyncReplayStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ReplayStrategy for AsyncReplayStrategy {
    /// Replay `input_path` batch by batch on a tokio multi-threaded runtime
    ///
    /// Fatal errors (file not found, runtime construction) are returned
    /// immediately. Rejected operations are logged and replay continues.
    fn replay(&self, input_path: &Path) -> Result<Arc<Ledger>, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let ledger = Arc::new(Ledger::new());
            let processor =
                BatchProcessor::new(Arc::clone(&ledger), self.config.max_concurrent_batches);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut applied = 0usize;
            let mut rejected = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for result in processor.process_batch(batch).await {
                    if result.result.is_ok() {
                        applied += 1;
                    } else {
                        rejected += 1;
                    }
                }
            }

            info!("Replay finished: {} applied, {} rejected", applied, rejected);
            Ok(ledger)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{Report, SyncReplayStrategy};
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
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);

        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_concurrent_batches, num_cpus::get());
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncReplayStrategy::new(BatchConfig::default());

        let result = strategy.replay(Path::new("nonexistent.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_async_strategy_maintains_ordering_across_batches() {
        // Small batches force the withdrawals into later batches than the deposits
        let csv_content = format!(
            "{}open,a,,,A,,\n\
             open,b,,,B,,\n\
             deposit,a,,100,,,\n\
             deposit,b,,50,,,\n\
             withdraw,a,,30,,,\n\
             deposit,b,,25,,,\n\
             withdraw,a,,70,,,\n",
            HEADER
        );
        let file = create_temp_csv(&csv_content);

        let strategy = AsyncReplayStrategy::new(BatchConfig::new(2, 4));
        let ledger = strategy.replay(file.path()).unwrap();

        assert_eq!(ledger.get_balance("a").unwrap(), Decimal::ZERO);
        assert_eq!(ledger.get_balance("b").unwrap(), Decimal::new(75, 0));
        assert_eq!(ledger.transaction_count(), 5);
    }

    #[test]
    fn test_async_strategy_matches_sync_output() {
        let csv_content = format!(
            "{}open,alice,,,Alice,alice@example.com,\n\
             open,bob,,,Bob,bob@example.com,\n\
             open,carol,,,Carol,,\n\
             deposit,alice,,100.50,,,\n\
             deposit,carol,,12,,,\n\
             transfer,alice,bob,30.25,,,\n\
             transfer,carol,bob,2.5,,,\n\
             withdraw,carol,,100,,,rejected\n",
            HEADER
        );
        let file = create_temp_csv(&csv_content);

        let mut sync_output = Vec::new();
        SyncReplayStrategy
            .process(file.path(), &Report::Balances, &mut sync_output)
            .unwrap();

        let mut async_output = Vec::new();
        AsyncReplayStrategy::new(BatchConfig::new(3, 4))
            .process(file.path(), &Report::Balances, &mut async_output)
            .unwrap();

        assert_eq!(async_output, sync_output);
    }
}
