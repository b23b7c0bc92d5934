//! Capability traits for reusable observers.
//!
//! These traits abstract over solver-specific event and action types, so
//! observers can be written once against the capability they need.
//!
//! # Event traits
//!
//! - [`HasObjective`] — events that carry an objective value
//! - [`HasIteration`] — events that mark an iteration boundary
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//! - [`CanAssumeWorse`] — actions that can mark a candidate as unusable
//!
//! # Example
//!
//! ```rust
//! use shellfit_core::Observer;
//! use shellfit_observers::traits::{CanStopEarly, HasObjective};
//!
//! struct GoodEnough {
//!     threshold: f64,
//! }
//!
//! impl<E: HasObjective, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.objective() < self.threshold).then(A::stop_early)
//!     }
//! }
//! ```

use shellfit_solvers::optimization::nelder_mead;

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    ///
    /// Returns `f64::NAN` when the event represents a failed evaluation.
    fn objective(&self) -> f64;
}

/// An event that may mark the end of an iteration.
pub trait HasIteration {
    /// Returns the completed iteration number, or `None` if this event is not
    /// an iteration boundary.
    fn iteration(&self) -> Option<usize>;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

/// An action type that can mark an evaluated candidate as unusable.
pub trait CanAssumeWorse {
    /// Returns the action that treats the candidate as failed.
    fn assume_worse() -> Self;
}

// --- Event impls for nelder_mead::Event ---

impl<E> HasObjective for nelder_mead::Event<'_, E> {
    fn objective(&self) -> f64 {
        match self {
            nelder_mead::Event::Evaluated { point, .. } => point.objective,
            nelder_mead::Event::Iterated { record, .. } => record.objective,
            nelder_mead::Event::EvaluationFailed { .. } => f64::NAN,
        }
    }
}

impl<E> HasIteration for nelder_mead::Event<'_, E> {
    fn iteration(&self) -> Option<usize> {
        match self {
            nelder_mead::Event::Iterated { record, .. } => Some(record.iter),
            nelder_mead::Event::Evaluated { .. } | nelder_mead::Event::EvaluationFailed { .. } => {
                None
            }
        }
    }
}

// --- Action impls for nelder_mead::Action ---

impl CanStopEarly for nelder_mead::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanAssumeWorse for nelder_mead::Action {
    fn assume_worse() -> Self {
        Self::AssumeWorse
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use shellfit_solvers::optimization::{
        TrialError,
        nelder_mead::{Action, Event, IterationRecord, Point, Simplex, Step},
    };

    type Ev<'a> = Event<'a, Infallible>;

    #[test]
    fn evaluated_event_exposes_objective() {
        let event: Ev<'_> = Event::Evaluated {
            point: Point::measured(1.0, 0.25, 0.5),
            step: Step::Reflect,
        };

        assert_eq!(event.objective(), 0.25);
        assert_eq!(event.iteration(), None);
    }

    #[test]
    fn failed_event_has_nan_objective() {
        let error = TrialError::NonPositive(-1.0);
        let event: Ev<'_> = Event::EvaluationFailed {
            x: -1.0,
            step: Step::Expand,
            error: &error,
        };

        assert!(event.objective().is_nan());
        assert_eq!(event.iteration(), None);
    }

    #[test]
    fn iterated_event_marks_boundary() {
        let best = Point::measured(1.0, 0.25, 0.5);
        let event: Ev<'_> = Event::Iterated {
            record: IterationRecord {
                iter: 3,
                x: best.x,
                measurement: best.measurement,
                objective: best.objective,
            },
            simplex: Simplex::new([best, best, best]),
        };

        assert_eq!(event.iteration(), Some(3));
        assert_eq!(event.objective(), 0.25);
    }

    #[test]
    fn actions_construct() {
        assert_eq!(Action::stop_early(), Action::StopEarly);
        assert_eq!(Action::assume_worse(), Action::AssumeWorse);
    }
}
