//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which applies a batch of
//! operation records to a shared ledger using several threads at once.
//!
//! # Design
//!
//! Within a batch:
//! 1. `open` records are applied first, sequentially and in file order, so that
//!    every account the batch registers exists before anything touches it.
//! 2. The remaining records are partitioned by their primary account. Each
//!    partition is applied in file order on a blocking worker thread, and
//!    at most `max_concurrent` partitions run at the same time.
//!
//! Cross-account consistency is the ledger's job: a transfer from one
//! partition and a deposit from another serialize at the shared account's
//! lock. Only the relative order of records in different partitions is left
//! unspecified.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<Ledger>     (shared, internally synchronized)
//!     └── Arc<Semaphore>  (one permit per running partition)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::core::Ledger;
use crate::strategy::apply_operation;
use crate::types::{AccountId, LedgerError, OperationRecord, OperationType};
use log::{error, warn};

/// Result of applying a single operation record
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The record that was applied
    pub record: OperationRecord,

    /// The result of applying it
    pub result: Result<(), LedgerError>,
}

/// Batch processor with account-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    ledger: Arc<Ledger>,
    permits: Arc<Semaphore>,
}

impl BatchProcessor {
    /// Create a new BatchProcessor over a shared ledger
    ///
    /// At most `max_concurrent` partitions are applied at once; zero is
    /// treated as one.
    pub fn new(ledger: Arc<Ledger>, max_concurrent: usize) -> Self {
        Self {
            ledger,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Split a batch into account openings and per-account partitions
    ///
    /// # Guarantees
    ///
    /// - Each record appears exactly once in the output
    /// - Openings keep their original order
    /// - Records of each partition keep their original order
    pub fn partition_by_account(
        &self,
        batch: Vec<OperationRecord>,
    ) -> (Vec<OperationRecord>, HashMap<AccountId, Vec<OperationRecord>>) {
        let mut openings = Vec::new();
        let mut partitions: HashMap<AccountId, Vec<OperationRecord>> = HashMap::new();

        for record in batch {
            if record.op_type == OperationType::Open {
                openings.push(record);
            } else {
                partitions
                    .entry(record.account.clone())
                    .or_default()
                    .push(record);
            }
        }

        (openings, partitions)
    }

    /// Apply records one after another on the current thread
    pub fn apply_sequential(&self, records: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        records
            .into_iter()
            .map(|record| {
                let result = apply_operation(&self.ledger, &record);
                if let Err(e) = &result {
                    warn!("Operation rejected: {}", e);
                }
                ProcessingResult { record, result }
            })
            .collect()
    }

    /// Apply a batch of records
    ///
    /// Openings run first, then one blocking task per account partition.
    /// Blocking tasks are used because ledger operations may wait on account
    /// locks.
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per record. Openings come first; the order of
    /// the remaining results follows task completion, not file order.
    pub async fn process_batch(&self, batch: Vec<OperationRecord>) -> Vec<ProcessingResult> {
        let (openings, partitions) = self.partition_by_account(batch);

        let mut results = self.apply_sequential(openings);

        let processor = self.clone();
        let partition_results = self
            .run_partitions(partitions.into_values().collect(), move |records| {
                processor.apply_sequential(records)
            })
            .await;
        results.extend(partition_results);

        results
    }

    /// Run `apply` on every partition, each on a blocking thread
    ///
    /// A permit is taken before a partition is spawned and released when it
    /// finishes, which bounds the number of partitions in flight.
    async fn run_partitions<F>(
        &self,
        partitions: Vec<Vec<OperationRecord>>,
        apply: F,
    ) -> Vec<ProcessingResult>
    where
        F: Fn(Vec<OperationRecord>) -> Vec<ProcessingResult> + Send + Sync + 'static,
    {
        let apply = Arc::new(apply);
        let mut tasks = Vec::with_capacity(partitions.len());

        for records in partitions {
            let permit = match Arc::clone(&self.permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    error!("Partition scheduling stopped: {}", e);
                    break;
                }
            };
            let apply = Arc::clone(&apply);
            tasks.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                apply(records)
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(partition_results) => results.extend(partition_results),
                Err(e) => error!("Replay task failed: {:?}", e),
            }
        }

        results
    }
}
