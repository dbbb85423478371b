//! Synchronous replay strategy
//!
//! Applies operation records one at a time, in file order, on the calling
//! thread. The resulting ledger state is fully deterministic.

use crate::core::Ledger;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{apply_operation, ReplayStrategy};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

/// Sequential replay strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncReplayStrategy;

impl ReplayStrategy for SyncReplayStrategy {
    /// Replay every record of `input_path` in order
    ///
    /// Fatal errors (file not found) are returned immediately. Malformed rows
    /// and rejected operations are logged and replay continues.
    fn replay(&self, input_path: &Path) -> Result<Arc<Ledger>, String> {
        let ledger = Ledger::new();
        let reader = SyncReader::new(input_path)?;

        let mut applied = 0usize;
        let mut rejected = 0usize;
        for result in reader {
            match result {
                Ok(record) => match apply_operation(&ledger, &record) {
                    Ok(()) => applied += 1,
                    Err(e) => {
                        rejected += 1;
                        warn!("Operation rejected: {}", e);
                    }
                },
                Err(e) => warn!("CSV parsing error: {}", e),
            }
        }

        info!("Replay finished: {} applied, {} rejected", applied, rejected);
        Ok(Arc::new(ledger))
    }
}
