use std::time::Duration;

use super::Point;

/// Indicates how the search terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Status {
    /// The best measurement is within tolerance of the target.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// Stopped early due to an observer decision.
    StoppedByObserver,

    /// The oracle could not be reset between trials.
    OracleUnavailable,
}

/// The best point after one completed iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IterationRecord {
    /// The 1-based iteration number.
    pub iter: usize,

    /// Best x after the iteration.
    pub x: f64,

    /// Measurement at the best x, if it succeeded.
    pub measurement: Option<f64>,

    /// Objective at the best x.
    pub objective: f64,
}

impl IterationRecord {
    pub(super) fn new(iter: usize, best: Point) -> Self {
        Self {
            iter,
            x: best.x,
            measurement: best.measurement,
            objective: best.objective,
        }
    }
}

/// The result of a Nelder-Mead search.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Solution {
    /// Final solver status.
    pub status: Status,

    /// Best x found.
    pub x: f64,

    /// Measurement at the best x, or `None` if every candidate failed.
    pub measurement: Option<f64>,

    /// Objective value at the best x.
    pub objective: f64,

    /// Number of completed iterations.
    pub iters: usize,

    /// Number of times the oracle evaluated a candidate.
    pub evaluations: usize,

    /// Wall-clock time from the first evaluation to termination.
    pub elapsed: Duration,

    /// The best point after each completed iteration.
    pub history: Vec<IterationRecord>,
}
