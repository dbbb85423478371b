//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account metadata and amount formatting
//! - `transaction`: Transaction records, identifiers and replay operations
//! - `error`: Error types for the ledger

pub mod account;
pub mod error;
pub mod transaction;

pub use account::{format_amount, Account, AccountId};
pub use error::LedgerError;
pub use transaction::{
    OperationRecord, OperationType, Transaction, TransactionId, TransactionKind,
};
