use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::AccountNumber;

/// Row-level critical sections, one async mutex per account number.
///
/// Waiters on the same account are woken in FIFO order, so adjustments apply
/// in call order. Different accounts never share a mutex.
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<AccountNumber, Arc<AsyncMutex<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one account. Access ends when the guard drops.
    pub async fn lock(&self, account_number: AccountNumber) -> OwnedMutexGuard<()> {
        let lock = {
            // Nothing in the map can be left half-updated by a panic.
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(account_number).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the entry for `account_number` unless some caller still holds or
    /// awaits its mutex. Used when the account turned out not to exist.
    pub fn forget(&self, account_number: AccountNumber) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(&account_number)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&account_number);
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
