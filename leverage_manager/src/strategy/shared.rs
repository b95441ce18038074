//! Shared Strategy Handle
//!
//! Entry points of [`LeveragedStrategy`] take `&mut self`, so a single owner
//! always runs them one at a time. Callers that hand the same strategy to
//! several threads go through this handle instead, which serializes them
//! behind a mutex.
//!
//! ```plain
//!   thread A ──┐                      ┌──► with(f)     waits for the lock
//!              ├──► SharedStrategy ───┤
//!   thread B ──┘    Arc<Mutex<_>>     └──► try_with(f) fails fast with Locked
//! ```

use std::sync::{Arc, Mutex, TryLockError};

use crate::{
    chain::Chain,
    utils::error::{ManagerError, ManagerResult},
};

use super::executable::LeveragedStrategy;

/// Cloneable handle to one strategy
pub struct SharedStrategy<C: Chain> {
    inner: Arc<Mutex<LeveragedStrategy<C>>>,
}

impl<C: Chain> Clone for SharedStrategy<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Chain> SharedStrategy<C> {
    pub fn new(strategy: LeveragedStrategy<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(strategy)),
        }
    }

    /// Runs `f` once every earlier caller has released the strategy.
    ///
    /// # Returns
    /// * `Err(ManagerError::Locked)` - A previous holder panicked while holding the lock
    pub fn with<T, F>(&self, f: F) -> ManagerResult<T>
    where
        F: FnOnce(&mut LeveragedStrategy<C>) -> ManagerResult<T>,
    {
        let mut strategy = self.inner.lock().map_err(|_| ManagerError::Locked)?;
        f(&mut strategy)
    }

    /// Runs `f` only if nobody else holds the strategy right now.
    ///
    /// # Returns
    /// * `Err(ManagerError::Locked)` - The strategy is busy or its lock is poisoned
    pub fn try_with<T, F>(&self, f: F) -> ManagerResult<T>
    where
        F: FnOnce(&mut LeveragedStrategy<C>) -> ManagerResult<T>,
    {
        let mut strategy = match self.inner.try_lock() {
            Ok(strategy) => strategy,
            Err(TryLockError::WouldBlock) | Err(TryLockError::Poisoned(_)) => {
                return Err(ManagerError::Locked)
            }
        };
        f(&mut strategy)
    }
}
