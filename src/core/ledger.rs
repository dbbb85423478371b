//! Ledger service and transfer coordination
//!
//! This module provides the `Ledger` struct, the explicitly constructed service
//! that owns the account registry, the per-account lock table and the
//! transaction log, and coordinates deposits, withdrawals and transfers across
//! them.
//!
//! # Architecture
//!
//! ```text
//! Ledger
//!     ├── AccountRegistry  (structural RwLock + per-slot balance cells)
//!     ├── LockManager      (DashMap of per-account mutexes)
//!     ├── TransactionLog   (append-only RwLock<Vec<_>>)
//!     └── AtomicU64        (transaction id counter)
//! ```
//!
//! # Locking Protocol
//!
//! Every operation validates its amount and resolves the involved accounts
//! through the registry before taking any account lock. Balance changes, the
//! sufficiency check that guards them and the log append all happen inside the
//! account lock scope, so two operations sharing an account are serialized and
//! logged in the order their critical sections complete.
//!
//! A transfer needs two account locks. Both are always acquired in ascending
//! order of account id, independent of which side is debited. Since no
//! operation holds more than two account locks and the registry and log locks
//! are never held while waiting on an account lock, no cycle of waiters can
//! form.

use crate::core::lock_manager::{acquire, AccountLock, LockManager};
use crate::core::registry::AccountRegistry;
use crate::core::transaction_log::TransactionLog;
use crate::types::{Account, LedgerError, Transaction, TransactionId, TransactionKind};
use chrono::Utc;
use log::debug;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory multi-account ledger
///
/// # Thread Safety
///
/// All methods take `&self`; share the ledger across threads with an `Arc`.
/// Operations on disjoint accounts proceed in parallel, operations sharing an
/// account are serialized at that account's lock.
#[derive(Debug)]
pub struct Ledger {
    registry: AccountRegistry,
    locks: LockManager,
    log: TransactionLog,
    next_tx_id: AtomicU64,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            registry: AccountRegistry::new(),
            locks: LockManager::new(),
            log: TransactionLog::new(),
            next_tx_id: AtomicU64::new(1),
        }
    }

    /// Register a new account with a zero balance
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the account was created
    /// * `Err(LedgerError::AlreadyExists)` if `id` is already registered
    pub fn create_account(&self, id: &str, name: &str, contact: &str) -> Result<(), LedgerError> {
        self.registry.create(Account::new(id, name, contact))?;
        debug!("Created account {}", id);
        Ok(())
    }

    /// Credit `amount` to `id`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the deposit was applied and logged
    /// * `Err(LedgerError::InvalidAmount)` - If `amount` is not strictly positive
    /// * `Err(LedgerError::NotFound)` - If `id` is not registered
    /// * `Err(LedgerError::ArithmeticOverflow)` - If the balance would overflow
    pub fn deposit(&self, id: &str, amount: Decimal, description: &str) -> Result<(), LedgerError> {
        validate_amount(amount)?;
        let slot = self.registry.slot(id)?;

        let lock = self.locks.lock_for(id);
        let _guard = acquire(&lock);

        let updated = slot
            .balance()
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", id))?;
        slot.set_balance(updated);
        let tx_id = self.record(TransactionKind::Deposit, id, id, amount, description);

        debug!("{}: deposited {} into {} (balance {})", tx_id, amount, id, updated);
        Ok(())
    }

    /// Debit `amount` from `id`
    ///
    /// The sufficiency check and the subtraction happen under one lock
    /// acquisition.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the withdrawal was applied and logged
    /// * `Err(LedgerError::InvalidAmount)` - If `amount` is not strictly positive
    /// * `Err(LedgerError::NotFound)` - If `id` is not registered
    /// * `Err(LedgerError::InsufficientBalance)` - If the balance is below `amount`
    pub fn withdraw(&self, id: &str, amount: Decimal, description: &str) -> Result<(), LedgerError> {
        validate_amount(amount)?;
        let slot = self.registry.slot(id)?;

        let lock = self.locks.lock_for(id);
        let _guard = acquire(&lock);

        let balance = slot.balance();
        if balance < amount {
            return Err(LedgerError::insufficient_balance(id, balance, amount));
        }
        let updated = balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("withdraw", id))?;
        slot.set_balance(updated);
        let tx_id = self.record(TransactionKind::Withdraw, id, id, amount, description);

        debug!("{}: withdrew {} from {} (balance {})", tx_id, amount, id, updated);
        Ok(())
    }

    /// Move `amount` from `from` to `to`
    ///
    /// Both account locks are taken in ascending id order before either
    /// balance is touched; both new balances are computed before either is
    /// written, so a failure leaves both accounts unchanged.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the transfer was applied and logged
    /// * `Err(LedgerError::InvalidAmount)` - If `amount` is not strictly positive
    /// * `Err(LedgerError::InvalidSameAccount)` - If `from == to`
    /// * `Err(LedgerError::NotFound)` - If either account is not registered
    /// * `Err(LedgerError::InsufficientBalance)` - If `from` holds less than `amount`
    /// * `Err(LedgerError::ArithmeticOverflow)` - If `to` would overflow
    pub fn transfer(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        description: &str,
    ) -> Result<(), LedgerError> {
        validate_amount(amount)?;
        if from == to {
            return Err(LedgerError::same_account(from));
        }

        let from_slot = self.registry.slot(from)?;
        let to_slot = self.registry.slot(to)?;

        let (first, second) = self.ordered_locks(from, to);
        let _first = acquire(&first);
        let _second = acquire(&second);

        let from_balance = from_slot.balance();
        if from_balance < amount {
            return Err(LedgerError::insufficient_balance(from, from_balance, amount));
        }
        let debited = from_balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", from))?;
        let credited = to_slot
            .balance()
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", to))?;

        from_slot.set_balance(debited);
        to_slot.set_balance(credited);
        let tx_id = self.record(TransactionKind::Transfer, from, to, amount, description);

        debug!("{}: transferred {} from {} to {}", tx_id, amount, from, to);
        Ok(())
    }

    /// [`Ledger::deposit`] taking a floating-point amount
    ///
    /// The amount is converted to its shortest decimal representation before
    /// any arithmetic, so `0.1` becomes exactly `0.1`.
    pub fn deposit_f64(&self, id: &str, amount: f64, description: &str) -> Result<(), LedgerError> {
        self.deposit(id, decimal_from_f64(amount)?, description)
    }

    /// [`Ledger::withdraw`] taking a floating-point amount
    pub fn withdraw_f64(&self, id: &str, amount: f64, description: &str) -> Result<(), LedgerError> {
        self.withdraw(id, decimal_from_f64(amount)?, description)
    }

    /// [`Ledger::transfer`] taking a floating-point amount
    pub fn transfer_f64(
        &self,
        from: &str,
        to: &str,
        amount: f64,
        description: &str,
    ) -> Result<(), LedgerError> {
        self.transfer(from, to, decimal_from_f64(amount)?, description)
    }

    /// Current balance of `id`
    pub fn get_balance(&self, id: &str) -> Result<Decimal, LedgerError> {
        self.registry.balance(id)
    }

    /// [`Ledger::get_balance`] as a floating-point value, for display only
    pub fn get_balance_f64(&self, id: &str) -> Result<f64, LedgerError> {
        self.get_balance(id)?
            .to_f64()
            .ok_or_else(|| LedgerError::arithmetic_overflow("balance conversion", id))
    }

    /// Metadata of `id`
    pub fn account(&self, id: &str) -> Result<Account, LedgerError> {
        Ok(self.registry.slot(id)?.account().clone())
    }

    /// Transactions touching `id`, in log order
    pub fn history_for(&self, id: &str) -> Result<Vec<Transaction>, LedgerError> {
        if !self.registry.exists(id) {
            return Err(LedgerError::not_found(id));
        }
        Ok(self.log.history_for(id))
    }

    /// Snapshot of all registered accounts, in unspecified order
    pub fn list_accounts(&self) -> Vec<Account> {
        self.registry.list()
    }

    /// Snapshot of all accounts with their balances, in unspecified order
    pub fn balances(&self) -> Vec<(Account, Decimal)> {
        self.registry.balances()
    }

    /// Sum of all balances
    ///
    /// Only meaningful while no operation is in flight: a concurrent transfer
    /// may be observed on one side only.
    pub fn total_balance(&self) -> Decimal {
        self.registry
            .balances()
            .into_iter()
            .map(|(_, balance)| balance)
            .sum()
    }

    /// Full transaction log, in append order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.log.entries()
    }

    /// Number of logged transactions
    pub fn transaction_count(&self) -> usize {
        self.log.len()
    }

    /// Locks of both accounts in acquisition order (ascending account id)
    fn ordered_locks(&self, a: &str, b: &str) -> (AccountLock, AccountLock) {
        let lock_a = self.locks.lock_for(a);
        let lock_b = self.locks.lock_for(b);
        if a < b {
            (lock_a, lock_b)
        } else {
            (lock_b, lock_a)
        }
    }

    /// Append a transaction to the log; callers hold the involved account locks
    fn record(
        &self,
        kind: TransactionKind,
        from: &str,
        to: &str,
        amount: Decimal,
        description: &str,
    ) -> TransactionId {
        let id = TransactionId(self.next_tx_id.fetch_add(1, Ordering::Relaxed));
        self.log.append(Transaction {
            id,
            from: from.to_string(),
            to: to.to_string(),
            amount,
            kind,
            description: description.to_string(),
            timestamp: Utc::now(),
        });
        id
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject zero and negative amounts
fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

/// Convert a floating-point amount at the API boundary
///
/// A non-zero input that rounds to zero is rejected with the caller's value.
fn decimal_from_f64(amount: f64) -> Result<Decimal, LedgerError> {
    let value = Decimal::from_f64(amount).ok_or_else(|| LedgerError::invalid_amount(amount))?;
    if value.is_zero() && amount != 0.0 {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(value)
}
