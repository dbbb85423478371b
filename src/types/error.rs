//! Error types for the wallet ledger
//!
//! Every ledger operation reports failure through [`LedgerError`]. All
//! variants are recoverable: the ledger stays usable after any of them and
//! no partial state is left behind.
//!
//! # Error Categories
//!
//! - **Registry Errors**: duplicate or unknown account ids
//! - **Validation Errors**: non-positive amounts, transfers to self
//! - **Balance Errors**: insufficient funds, arithmetic overflow

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for ledger operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An account with this id is already registered
    #[error("Account {account} already exists")]
    AlreadyExists {
        /// The duplicated account id
        account: String,
    },

    /// No account with this id is registered
    #[error("Account {account} not found")]
    NotFound {
        /// The unknown account id
        account: String,
    },

    /// Amount is zero, negative or not representable
    #[error("Invalid amount '{amount}': must be strictly positive")]
    InvalidAmount {
        /// The rejected amount, as supplied
        amount: String,
    },

    /// The debited account does not hold enough funds
    ///
    /// Checked under the account lock, so the reported balance is the one
    /// the decision was based on.
    #[error("Insufficient balance in account {account}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Debited account id
        account: String,
        /// Balance at the time of the check
        balance: Decimal,
        /// Requested amount
        requested: Decimal,
    },

    /// Source and destination of a transfer are the same account
    #[error("Cannot transfer from account {account} to itself")]
    InvalidSameAccount {
        /// The account id used on both sides
        account: String,
    },

    /// Applying the amount would overflow the fixed-point range
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Credited account id
        account: String,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AlreadyExists error
    pub fn already_exists(account: &str) -> Self {
        LedgerError::AlreadyExists {
            account: account.to_string(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(account: &str) -> Self {
        LedgerError::NotFound {
            account: account.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl ToString) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(account: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            account: account.to_string(),
            balance,
            requested,
        }
    }

    /// Create an InvalidSameAccount error
    pub fn same_account(account: &str) -> Self {
        LedgerError::InvalidSameAccount {
            account: account.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account: account.to_string(),
        }
    }
}
