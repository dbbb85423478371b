//! Transaction-related types for the wallet ledger
//!
//! This module defines the immutable transaction record appended to the log,
//! its identifier and kind, and the operation record consumed by replay.

use super::account::AccountId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction identifier
///
/// Assigned from a strictly monotonic per-ledger counter, so ids never
/// collide and increase in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx_{}", self.0)
    }
}

/// Kind of a completed ledger operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Funds credited to a single account
    Deposit,

    /// Funds debited from a single account
    Withdraw,

    /// Funds moved from one account to another
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

/// Immutable record of one completed operation
///
/// For deposits and withdrawals `from == to`. The amount is always the
/// strictly positive value that was applied; the direction is implied by
/// `kind` together with `from`/`to`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Unique transaction id
    pub id: TransactionId,

    /// Source account (debited for withdraw/transfer)
    pub from: AccountId,

    /// Destination account (credited for deposit/transfer)
    pub to: AccountId,

    /// Applied amount (> 0)
    pub amount: Decimal,

    /// Operation kind
    pub kind: TransactionKind,

    /// Free-text description supplied by the caller
    pub description: String,

    /// Creation timestamp
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Whether this transaction touches the given account
    pub fn involves(&self, account: &str) -> bool {
        self.from == account || self.to == account
    }

    /// Signed effect of this transaction on the given account's balance
    ///
    /// Returns zero for accounts the transaction does not touch.
    pub fn net_effect(&self, account: &str) -> Decimal {
        match self.kind {
            TransactionKind::Deposit if self.to == account => self.amount,
            TransactionKind::Withdraw if self.from == account => -self.amount,
            TransactionKind::Transfer if self.from == account => -self.amount,
            TransactionKind::Transfer if self.to == account => self.amount,
            _ => Decimal::ZERO,
        }
    }
}

/// Operation types accepted by the replay front-end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Register a new account
    Open,
    /// Deposit into `account`
    Deposit,
    /// Withdraw from `account`
    Withdraw,
    /// Transfer from `account` to `counterparty`
    Transfer,
}

/// Parsed replay operation
///
/// Produced by the CSV readers and applied to a ledger by the replay
/// strategies. Field presence is validated at conversion time, so every
/// `Deposit`/`Withdraw`/`Transfer` carries an amount and every `Transfer`
/// a counterparty.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    /// Kind of operation
    pub op_type: OperationType,

    /// Primary account (the one being opened, credited or debited)
    pub account: AccountId,

    /// Destination account for transfers
    pub counterparty: Option<AccountId>,

    /// Amount for balance-changing operations
    pub amount: Option<Decimal>,

    /// Display name (open only)
    pub name: String,

    /// Contact detail (open only)
    pub contact: String,

    /// Free-text description
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn transaction(kind: TransactionKind, from: &str, to: &str, amount: Decimal) -> Transaction {
        Transaction {
            id: TransactionId(1),
            from: from.to_string(),
            to: to.to_string(),
            amount,
            kind,
            description: String::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_transaction_id_display() {
        assert_eq!(TransactionId(42).to_string(), "tx_42");
    }

    #[rstest]
    #[case::deposit(TransactionKind::Deposit, "deposit")]
    #[case::withdraw(TransactionKind::Withdraw, "withdraw")]
    #[case::transfer(TransactionKind::Transfer, "transfer")]
    fn test_kind_display(#[case] kind: TransactionKind, #[case] expected: &str) {
        assert_eq!(kind.to_string(), expected);
    }

    #[rstest]
    #[case::deposit_credit(TransactionKind::Deposit, "a", "a", "a", Decimal::new(500, 2))]
    #[case::withdraw_debit(TransactionKind::Withdraw, "a", "a", "a", Decimal::new(-500, 2))]
    #[case::transfer_sender(TransactionKind::Transfer, "a", "b", "a", Decimal::new(-500, 2))]
    #[case::transfer_receiver(TransactionKind::Transfer, "a", "b", "b", Decimal::new(500, 2))]
    #[case::unrelated(TransactionKind::Transfer, "a", "b", "c", Decimal::ZERO)]
    fn test_net_effect(
        #[case] kind: TransactionKind,
        #[case] from: &str,
        #[case] to: &str,
        #[case] account: &str,
        #[case] expected: Decimal,
    ) {
        let tx = transaction(kind, from, to, Decimal::new(500, 2));
        assert_eq!(tx.net_effect(account), expected);
    }

    #[test]
    fn test_involves() {
        let tx = transaction(TransactionKind::Transfer, "a", "b", Decimal::ONE);

        assert!(tx.involves("a"));
        assert!(tx.involves("b"));
        assert!(!tx.involves("c"));
    }
}
