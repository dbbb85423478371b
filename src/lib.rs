//! Wallet Ledger Library
//! # Overview
//!
//! An in-memory, multi-account ledger supporting deposits, withdrawals and
//! transfers with exact fixed-point arithmetic and safe concurrent access.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerError, ...)
//! - [`core`] - Ledger components:
//!   - [`core::registry`] - Registered accounts and balance cells
//!   - [`core::lock_manager`] - Lazily created per-account locks
//!   - [`core::ledger`] - Deposit, withdrawal and transfer coordination
//!   - [`core::transaction_log`] - Append-only transaction log
//! - [`io`] - CSV operation input and balance/history output
//! - [`strategy`] - Sequential and concurrent replay of operation files
//! - [`cli`] - CLI arguments parsing
//!
//! # Concurrency
//!
//! A [`Ledger`] is shared across threads behind an `Arc`. Operations on
//! disjoint accounts run in parallel; operations sharing an account are
//! serialized at that account's lock. Transfers take both account locks in
//! ascending id order, which rules out deadlock between opposing transfers.
//!
//! ```
//! use rust_decimal::Decimal;
//! use wallet_ledger::Ledger;
//!
//! let ledger = Ledger::new();
//! ledger.create_account("alice", "Alice", "alice@example.com").unwrap();
//! ledger.create_account("bob", "Bob", "bob@example.com").unwrap();
//! ledger.deposit("alice", Decimal::new(10050, 2), "salary").unwrap();
//! ledger.transfer("alice", "bob", Decimal::new(3025, 2), "lunch").unwrap();
//!
//! assert_eq!(ledger.get_balance("alice").unwrap(), Decimal::new(7025, 2));
//! assert_eq!(ledger.history_for("bob").unwrap().len(), 1);
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{AccountRegistry, Ledger, LockManager, TransactionLog};
pub use io::{write_accounts_csv, write_history_csv};
pub use types::{
    Account, AccountId, LedgerError, OperationRecord, OperationType, Transaction, TransactionId,
    TransactionKind,
};
