//! Core traits and types for shellfit.
//!
//! This crate defines the shared abstractions that solvers and observers
//! build on:
//!
//! - [`Oracle`] — an expensive, stateful evaluation that realizes a candidate
//!   parameter and reports a measurement, with a reset to undo each trial
//! - [`Observer`] — receives solver events and optionally returns control actions
//! - [`SharedOracle`] — hands out exclusive access to an oracle so concurrent
//!   search requests never interleave against the same external state

mod observer;
mod oracle;
mod shared;

pub use observer::Observer;
pub use oracle::Oracle;
pub use shared::{ClaimError, OracleGuard, SharedOracle};
