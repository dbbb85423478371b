//! Core ledger module
//!
//! This module contains the ledger components:
//! - `registry` - Registered accounts and their balance cells
//! - `lock_manager` - Lazily created per-account locks
//! - `ledger` - Deposit, withdrawal and transfer coordination
//! - `transaction_log` - Append-only record of completed operations

pub mod ledger;
pub mod lock_manager;
pub mod registry;
pub mod transaction_log;

pub use ledger::Ledger;
pub use lock_manager::{AccountLock, LockManager};
pub use registry::{AccountRegistry, AccountSlot};
pub use transaction_log::TransactionLog;
