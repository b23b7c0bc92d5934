use thiserror::Error;
use tracing::{debug, warn};

use shellfit_core::Oracle;

/// Objective assigned to a candidate that could not be measured.
pub const DEFAULT_PENALTY: f64 = 1e6;

/// Why a candidate received the penalty objective instead of a measurement.
#[derive(Debug, Error)]
pub enum TrialError<E> {
    /// The candidate was non-positive or non-finite and was never sent to the oracle.
    #[error("candidate {0} is not a positive finite value")]
    NonPositive(f64),

    /// The oracle returned a measurement that is not finite.
    #[error("oracle returned a non-finite measurement: {0}")]
    NonFiniteMeasurement(f64),

    /// The oracle could not realize or measure the candidate.
    #[error("oracle evaluation failed")]
    Oracle(#[source] E),
}

/// The outcome of evaluating one candidate.
#[derive(Debug)]
pub enum Trial<E> {
    /// The oracle produced a measurement.
    Measured {
        x: f64,
        measurement: f64,
        objective: f64,
    },

    /// The candidate could not be measured and carries the penalty objective.
    Failed {
        x: f64,
        objective: f64,
        error: TrialError<E>,
    },
}

impl<E> Trial<E> {
    /// Returns the evaluated candidate.
    #[must_use]
    pub fn x(&self) -> f64 {
        match self {
            Self::Measured { x, .. } | Self::Failed { x, .. } => *x,
        }
    }

    /// Returns the objective value assigned to the candidate.
    #[must_use]
    pub fn objective(&self) -> f64 {
        match self {
            Self::Measured { objective, .. } | Self::Failed { objective, .. } => *objective,
        }
    }

    /// Returns the measurement, if the oracle produced one.
    #[must_use]
    pub fn measurement(&self) -> Option<f64> {
        match self {
            Self::Measured { measurement, .. } => Some(*measurement),
            Self::Failed { .. } => None,
        }
    }
}

/// Adapts an [`Oracle`] into a squared-error objective against a target.
///
/// Every call to [`evaluate`](Self::evaluate) except the first resets the
/// oracle before realizing the next candidate, so each trial starts from
/// clean external state. Candidate failures map to `penalty` and never abort
/// the caller; only a failed reset is reported as an error, because the
/// oracle can no longer be trusted once a prior trial persists.
#[derive(Debug)]
pub struct Objective<'o, O> {
    oracle: &'o mut O,
    target: f64,
    penalty: f64,
    needs_reset: bool,
    evaluations: usize,
}

impl<'o, O: Oracle> Objective<'o, O> {
    /// Creates an adapter measuring squared error against `target`.
    pub fn new(oracle: &'o mut O, target: f64, penalty: f64) -> Self {
        Self {
            oracle,
            target,
            penalty,
            needs_reset: false,
            evaluations: 0,
        }
    }

    /// Returns the target measurement.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns the objective assigned to failed candidates.
    #[must_use]
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Returns how many times the oracle has been asked to evaluate a candidate.
    #[must_use]
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Evaluates the objective at `x`.
    ///
    /// # Errors
    ///
    /// Returns the oracle's reset error if the previous trial cannot be undone.
    pub fn evaluate(&mut self, x: f64) -> Result<Trial<O::Error>, O::ResetError> {
        if !x.is_finite() || x <= 0.0 {
            return Ok(self.fail(x, TrialError::NonPositive(x)));
        }

        if self.needs_reset {
            self.oracle.reset()?;
        }
        self.needs_reset = true;
        self.evaluations += 1;

        match self.oracle.evaluate(x) {
            Ok(measurement) if measurement.is_finite() => {
                let objective = (measurement - self.target).powi(2);
                debug!(x, measurement, objective, "candidate measured");
                Ok(Trial::Measured {
                    x,
                    measurement,
                    objective,
                })
            }
            Ok(measurement) => Ok(self.fail(x, TrialError::NonFiniteMeasurement(measurement))),
            Err(error) => Ok(self.fail(x, TrialError::Oracle(error))),
        }
    }

    fn fail(&self, x: f64, error: TrialError<O::Error>) -> Trial<O::Error> {
        warn!(x, penalty = self.penalty, %error, "candidate failed, assigning penalty");
        Trial::Failed {
            x,
            objective: self.penalty,
            error,
        }
    }
}
