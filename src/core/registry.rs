//! Account registry
//!
//! This module provides the `AccountRegistry` struct, which holds the set of
//! registered accounts together with their balances.
//!
//! # Synchronization
//!
//! Two independent domains are involved:
//!
//! - The registry structure (id to slot map) sits behind one `RwLock`. It is
//!   written only by account creation and read by lookups and enumeration.
//!   Lookups clone the slot's `Arc` and release the structural lock right away,
//!   so it is never held across a balance mutation or while waiting on an
//!   account lock.
//! - Each balance lives in its own `AccountSlot`. Writes happen only while the
//!   caller holds that account's lock from the lock manager; the cell itself is
//!   an `RwLock<Decimal>` so that a concurrent reader sees either the old or the
//!   new value, never a torn one.

use crate::types::{Account, AccountId, LedgerError};
use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// One registered account and its balance cell
#[derive(Debug)]
pub struct AccountSlot {
    account: Account,
    balance: RwLock<Decimal>,
}

impl AccountSlot {
    fn new(account: Account) -> Self {
        Self {
            account,
            balance: RwLock::new(Decimal::ZERO),
        }
    }

    /// Account metadata
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Current balance snapshot
    pub fn balance(&self) -> Decimal {
        *self.balance.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the balance
    ///
    /// Callers must hold this account's lock; the registry does not check it.
    pub(crate) fn set_balance(&self, value: Decimal) {
        *self.balance.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// Registry of known accounts and their balances
#[derive(Debug, Default)]
pub struct AccountRegistry {
    accounts: RwLock<HashMap<AccountId, Arc<AccountSlot>>>,
}

impl AccountRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new account with a zero balance
    ///
    /// The duplicate check and the insert happen under one write lock, so of
    /// several concurrent calls for the same id exactly one succeeds.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the account was registered
    /// * `Err(LedgerError::AlreadyExists)` if the id is taken
    pub fn create(&self, account: Account) -> Result<(), LedgerError> {
        let mut accounts = self
            .accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        match accounts.entry(account.id.clone()) {
            Entry::Occupied(_) => Err(LedgerError::already_exists(&account.id)),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(AccountSlot::new(account)));
                Ok(())
            }
        }
    }

    /// Whether `id` is registered
    pub fn exists(&self, id: &str) -> bool {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    /// Look up the slot for `id`
    ///
    /// The structural read lock is released before returning; the slot stays
    /// valid because accounts are never removed.
    pub fn slot(&self, id: &str) -> Result<Arc<AccountSlot>, LedgerError> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
            .ok_or_else(|| LedgerError::not_found(id))
    }

    /// Current balance of `id`
    pub fn balance(&self, id: &str) -> Result<Decimal, LedgerError> {
        Ok(self.slot(id)?.balance())
    }

    /// Point-in-time copy of all registered accounts, in unspecified order
    pub fn list(&self) -> Vec<Account> {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|slot| slot.account().clone())
            .collect()
    }

    /// Copy of every account paired with its balance at the time of reading
    pub fn balances(&self) -> Vec<(Account, Decimal)> {
        let slots: Vec<Arc<AccountSlot>> = self
            .accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        slots
            .iter()
            .map(|slot| (slot.account().clone(), slot.balance()))
            .collect()
    }

    /// Number of registered accounts
    pub fn len(&self) -> usize {
        self.accounts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no account is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
