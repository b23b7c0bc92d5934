use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

use thiserror::Error;

use crate::Oracle;

/// Errors that can occur when claiming a [`SharedOracle`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// Another search currently holds the oracle.
    #[error("oracle is in use by another search")]
    Busy,

    /// A previous holder panicked while the external state was mid-trial.
    #[error("oracle was poisoned by a panicked search")]
    Poisoned,
}

/// An oracle shared between callers that may request searches concurrently.
///
/// Each evaluation mutates external state, so two searches must never
/// interleave against the same oracle. Cloning a `SharedOracle` shares the
/// underlying oracle; a search first claims it, then runs against the
/// returned [`OracleGuard`], which releases the claim when dropped.
#[derive(Debug)]
pub struct SharedOracle<O> {
    inner: Arc<Mutex<O>>,
}

impl<O> Clone for SharedOracle<O> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<O: Oracle> SharedOracle<O> {
    /// Wraps an oracle for shared use.
    pub fn new(oracle: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(oracle)),
        }
    }

    /// Blocks until no other search holds the oracle, then claims it.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Poisoned`] if a previous holder panicked.
    pub fn claim(&self) -> Result<OracleGuard<'_, O>, ClaimError> {
        self.inner
            .lock()
            .map(OracleGuard)
            .map_err(|_| ClaimError::Poisoned)
    }

    /// Claims the oracle only if no other search currently holds it.
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::Busy`] if a search is in flight, or
    /// [`ClaimError::Poisoned`] if a previous holder panicked.
    pub fn try_claim(&self) -> Result<OracleGuard<'_, O>, ClaimError> {
        match self.inner.try_lock() {
            Ok(guard) => Ok(OracleGuard(guard)),
            Err(TryLockError::WouldBlock) => Err(ClaimError::Busy),
            Err(TryLockError::Poisoned(_)) => Err(ClaimError::Poisoned),
        }
    }
}

/// Exclusive access to a [`SharedOracle`] for the lifetime of one search.
#[derive(Debug)]
pub struct OracleGuard<'a, O>(MutexGuard<'a, O>);

impl<O: Oracle> Oracle for OracleGuard<'_, O> {
    type Error = O::Error;
    type ResetError = O::ResetError;

    fn reset(&mut self) -> Result<(), Self::ResetError> {
        self.0.reset()
    }

    fn evaluate(&mut self, candidate: f64) -> Result<f64, Self::Error> {
        self.0.evaluate(candidate)
    }
}
