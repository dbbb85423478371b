//! Per-account lock table
//!
//! This module provides the `LockManager` struct, which lazily creates and hands
//! out one exclusive lock per account id. Every balance mutation of an account
//! happens while holding that account's lock.
//!
//! # Design
//!
//! The table is a `DashMap` from account id to an `Arc<Mutex<()>>`. Get-or-create
//! goes through `DashMap::entry`, which holds the shard write lock across the
//! lookup and the insert, so two threads racing on an unseen id always receive
//! the same `Arc`. Lock *identity* matters here, not just lock state: two
//! distinct mutexes for one account would not exclude each other.
//!
//! Entries are never removed. Accounts are never deleted, and a removed entry
//! could be recreated while an older handle is still held.
//!
//! The manager knows nothing about account existence; validation happens in
//! the registry before a lock is used.

use crate::types::AccountId;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared handle to one account's exclusive lock
pub type AccountLock = Arc<Mutex<()>>;

/// Lazily populated table of per-account locks
#[derive(Debug, Default)]
pub struct LockManager {
    /// Account id to lock handle, populated on first use
    locks: DashMap<AccountId, AccountLock>,
}

impl LockManager {
    /// Create an empty lock table
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Return the unique lock for `account`, creating it on first use
    ///
    /// # Thread Safety
    ///
    /// Creation is exactly-once under concurrent first access: every caller
    /// receives a clone of the same `Arc`.
    pub fn lock_for(&self, account: &str) -> AccountLock {
        if let Some(lock) = self.locks.get(account) {
            return Arc::clone(lock.value());
        }

        let entry = self
            .locks
            .entry(account.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(entry.value())
    }

    /// Number of locks created so far
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no lock has been created yet
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Block until `lock` is held
///
/// The lock guards `()`, so a poisoned mutex carries no broken state and is
/// simply taken over.
pub fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    #[test]
    fn test_lock_for_creates_lock_on_first_use() {
        let manager = LockManager::new();
        assert!(manager.is_empty());

        let _lock = manager.lock_for("alice");

        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_lock_for_returns_same_handle() {
        let manager = LockManager::new();

        let first = manager.lock_for("alice");
        let second = manager.lock_for("alice");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_lock_for_distinct_accounts_get_distinct_locks() {
        let manager = LockManager::new();

        let alice = manager.lock_for("alice");
        let bob = manager.lock_for("bob");

        assert!(!Arc::ptr_eq(&alice, &bob));
        assert_eq!(manager.len(), 2);
    }

    #[test]
    fn test_lock_for_hands_out_locks_for_unregistered_ids() {
        let manager = LockManager::new();

        // No registry involved: any id gets a lock
        let lock = manager.lock_for("nobody");
        let _guard = acquire(&lock);

        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_concurrent_first_access_resolves_to_same_lock() {
        let manager = Arc::new(LockManager::new());
        let barrier = Arc::new(Barrier::new(16));

        let mut handles = vec![];
        for _ in 0..16 {
            let manager_clone = Arc::clone(&manager);
            let barrier_clone = Arc::clone(&barrier);
            handles.push(thread::spawn(move || {
                barrier_clone.wait();
                manager_clone.lock_for("contended")
            }));
        }

        let locks: Vec<AccountLock> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(manager.len(), 1);
        for lock in &locks[1..] {
            assert!(Arc::ptr_eq(&locks[0], lock));
        }
    }

    #[test]
    fn test_acquire_recovers_from_poisoned_lock() {
        let manager = Arc::new(LockManager::new());
        let lock = manager.lock_for("alice");

        let poisoner = Arc::clone(&lock);
        let _ = thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(lock.is_poisoned());
        let _guard = acquire(&lock);
    }
}
