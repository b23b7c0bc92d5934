use crate::optimization::Trial;

/// A candidate paired with its cached objective value.
///
/// `measurement` is `None` when the candidate could not be measured, in which
/// case `objective` holds the penalty.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Point {
    /// The candidate parameter value.
    pub x: f64,

    /// The objective value at x.
    pub objective: f64,

    /// The oracle's measurement at x, if it succeeded.
    pub measurement: Option<f64>,
}

impl Point {
    /// Creates a point for a successfully measured candidate.
    #[must_use]
    pub fn measured(x: f64, objective: f64, measurement: f64) -> Self {
        Self {
            x,
            objective,
            measurement: Some(measurement),
        }
    }

    /// Creates a point for a candidate that failed and carries `penalty`.
    #[must_use]
    pub fn failed(x: f64, penalty: f64) -> Self {
        Self {
            x,
            objective: penalty,
            measurement: None,
        }
    }

    /// Returns true if the candidate has no measurement.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.measurement.is_none()
    }

    /// Returns `|measurement - target|`, or `None` for a failed candidate.
    #[must_use]
    pub fn deviation(&self, target: f64) -> Option<f64> {
        self.measurement.map(|m| (m - target).abs())
    }
}

impl<E> From<&Trial<E>> for Point {
    fn from(trial: &Trial<E>) -> Self {
        match trial.measurement() {
            Some(m) => Self::measured(trial.x(), trial.objective(), m),
            None => Self::failed(trial.x(), trial.objective()),
        }
    }
}
