//! Append-only transaction log
//!
//! This module provides the `TransactionLog` component, the process-wide
//! ordered record of completed operations. Entries are appended once and never
//! mutated or removed.
//!
//! # Ordering
//!
//! Appends are serialized by a single `RwLock`; the order of the log is the
//! order in which append critical sections complete. History queries take the
//! read side and scan the whole log, returning matches in append order.

use crate::types::Transaction;
use std::sync::{Arc, PoisonError, RwLock};

/// Process-wide ordered sequence of completed transactions
#[derive(Debug, Default)]
pub struct TransactionLog {
    /// Entries in append order
    entries: RwLock<Vec<Arc<Transaction>>>,
}

impl TransactionLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Append `tx` to the end of the log
    pub fn append(&self, tx: Transaction) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(tx));
    }

    /// Every transaction whose source or destination is `account`, in append order
    ///
    /// Existence of the account is not checked here; the ledger does that.
    pub fn history_for(&self, account: &str) -> Vec<Transaction> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|tx| tx.involves(account))
            .map(|tx| Transaction::clone(tx))
            .collect()
    }

    /// Copy of the full log in append order
    pub fn entries(&self) -> Vec<Transaction> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|tx| Transaction::clone(tx))
            .collect()
    }

    /// Number of logged transactions
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been logged yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TransactionId, TransactionKind};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::thread;

    fn tx(id: u64, kind: TransactionKind, from: &str, to: &str) -> Transaction {
        Transaction {
            id: TransactionId(id),
            from: from.to_string(),
            to: to.to_string(),
            amount: Decimal::ONE,
            kind,
            description: format!("entry {}", id),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = TransactionLog::new();

        assert!(log.is_empty());
        assert!(log.history_for("alice").is_empty());
    }

    #[test]
    fn test_append_preserves_order() {
        let log = TransactionLog::new();
        log.append(tx(1, TransactionKind::Deposit, "alice", "alice"));
        log.append(tx(2, TransactionKind::Withdraw, "alice", "alice"));
        log.append(tx(3, TransactionKind::Deposit, "bob", "bob"));

        let ids: Vec<u64> = log.entries().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_history_for_matches_source_or_destination() {
        let log = TransactionLog::new();
        log.append(tx(1, TransactionKind::Deposit, "alice", "alice"));
        log.append(tx(2, TransactionKind::Transfer, "alice", "bob"));
        log.append(tx(3, TransactionKind::Deposit, "carol", "carol"));
        log.append(tx(4, TransactionKind::Transfer, "carol", "alice"));

        let alice: Vec<u64> = log.history_for("alice").iter().map(|t| t.id.0).collect();
        let bob: Vec<u64> = log.history_for("bob").iter().map(|t| t.id.0).collect();

        assert_eq!(alice, vec![1, 2, 4]);
        assert_eq!(bob, vec![2]);
        assert!(log.history_for("dave").is_empty());
    }

    #[test]
    fn test_concurrent_appends_lose_nothing() {
        let log = Arc::new(TransactionLog::new());

        let mut handles = vec![];
        for t in 0..8u64 {
            let log_clone = Arc::clone(&log);
            handles.push(thread::spawn(move || {
                for i in 0..250u64 {
                    log_clone.append(tx(t * 1000 + i, TransactionKind::Deposit, "a", "a"));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let entries = log.entries();
        assert_eq!(entries.len(), 2000);

        // Per-thread order survives interleaving
        for t in 0..8u64 {
            let ids: Vec<u64> = entries
                .iter()
                .map(|e| e.id.0)
                .filter(|id| id / 1000 == t)
                .collect();
            let mut sorted = ids.clone();
            sorted.sort_unstable();
            assert_eq!(ids, sorted);
            assert_eq!(ids.len(), 250);
        }
    }
}
