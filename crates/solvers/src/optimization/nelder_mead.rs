//! Nelder-Mead simplex search for matching a target measurement.
//!
//! # Algorithm
//!
//! The solver searches a single positive parameter `x` for the value whose
//! measured outcome best matches a target. It minimizes the squared error
//! `(measurement - target)²` over a three-point simplex, starting from
//! `{x0, 1.1·x0, 1.2·x0}`. Each iteration sorts the simplex, reflects the worst
//! point through the centroid of the other two, and then accepts, expands,
//! contracts, or shrinks depending on how the reflection compares:
//!
//! ```text
//! reflected < best                  → expand, keep the better of the two
//! best ≤ reflected < second worst   → accept the reflection
//! second worst ≤ reflected < worst  → contract toward the worst point
//! reflected ≥ worst                 → contract on the reflected side
//! contraction no better than worst  → shrink toward the best point
//! ```
//!
//! The search converges once `|measurement - target| < tolerance` at the best
//! point. Iterations are counted from zero and the search gives up once the
//! count passes `max_iters`, so at most `max_iters + 1` iterations run.
//!
//! # When to Use
//!
//! Nelder-Mead suits oracles that are:
//! - Expensive, so every evaluation counts
//! - Noisy or non-smooth, so derivatives are unavailable or meaningless
//! - Fallible at specific parameter values, such as geometry that cannot be
//!   realized below a minimum thickness
//!
//! # Failure Handling
//!
//! A candidate the oracle cannot measure (or a non-positive candidate, which
//! is never sent to the oracle) receives the configured penalty objective and
//! the search continues, steering away from that region. Only a failed
//! [`Oracle::reset`](shellfit_core::Oracle::reset) aborts the run, with
//! [`Error::OracleUnavailable`] carrying the best point found so far.
//!
//! # Observer Events
//!
//! The solver emits one [`Event`] per oracle evaluation and one
//! [`Event::Iterated`] per completed iteration:
//!
//! - [`Event::Evaluated`] — candidate measured
//! - [`Event::EvaluationFailed`] — candidate failed and took the penalty
//! - [`Event::Iterated`] — iteration finished; carries its [`IterationRecord`]
//!
//! Observers can return [`Action::StopEarly`] to halt immediately, or
//! [`Action::AssumeWorse`] to treat an evaluated candidate as failed.
//!
//! # Concurrency
//!
//! Evaluations run one at a time: each one mutates external state that must
//! be reset before the next. The solver borrows the oracle mutably for the
//! whole run, so two runs can never interleave on one oracle. Callers that
//! accept concurrent requests can share an oracle through
//! [`SharedOracle`](shellfit_core::SharedOracle).

mod action;
mod config;
mod error;
mod event;
mod init;
mod point;
mod search;
mod simplex;
mod solution;
mod state;
mod step;

#[cfg(test)]
mod tests;

pub use action::Action;
pub use config::{Coefficients, Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use point::Point;
pub use simplex::Simplex;
pub use solution::{IterationRecord, Solution, Status};
pub use step::Step;

use shellfit_core::{Observer, Oracle};

use search::search;

/// Searches for the `x` whose measurement best matches `target`.
///
/// The search starts from `x0`, which must be finite and positive.
/// The observer receives an [`Event`] for each evaluation and each completed
/// iteration. See the [module docs](self) for details.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if `target` is not finite or `x0` is not
/// finite and positive; nothing is evaluated in that case. Returns
/// [`Error::OracleUnavailable`] if the oracle fails to reset between trials.
pub fn run<O, Obs>(
    oracle: &mut O,
    target: f64,
    x0: f64,
    config: &Config,
    observer: Obs,
) -> Result<Solution, Error>
where
    O: Oracle,
    Obs: for<'a> Observer<Event<'a, O::Error>, Action>,
{
    search(oracle, target, x0, config, observer)
}

/// Searches for the `x` whose measurement best matches `target`, without observer support.
///
/// This is a convenience wrapper around [`run`] that uses a no-op observer.
///
/// # Errors
///
/// Returns an error under the same conditions as [`run`].
pub fn run_unobserved<O: Oracle>(
    oracle: &mut O,
    target: f64,
    x0: f64,
    config: &Config,
) -> Result<Solution, Error> {
    run(oracle, target, x0, config, ())
}
