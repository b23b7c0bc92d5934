//! Solvers that drive an oracle's measurement toward a target value.
//!
//! An [`Oracle`] turns a candidate parameter into a measurement, or fails.
//! [`Objective`] adapts it into the quantity the solvers minimize: the squared
//! error `(measurement - target)²`, with a fixed penalty standing in for any
//! candidate the oracle could not realize.
//!
//! # Solvers
//!
//! - [`nelder_mead`] — derivative-free simplex search over a single positive
//!   parameter, tolerant of failing candidates
//!
//! [`Oracle`]: shellfit_core::Oracle

mod objective;

pub use objective::{DEFAULT_PENALTY, Objective, Trial, TrialError};

pub mod nelder_mead;
