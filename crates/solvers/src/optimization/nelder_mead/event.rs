use crate::optimization::TrialError;

use super::{IterationRecord, Point, Simplex, Step};

/// Events emitted by the Nelder-Mead solver.
///
/// Every oracle evaluation produces either [`Event::Evaluated`] or
/// [`Event::EvaluationFailed`], tagged with the [`Step`] that requested it.
/// Each completed iteration then produces one [`Event::Iterated`] carrying the
/// iteration's [`IterationRecord`], so observers see the record sequence as
/// it is produced.
#[derive(Debug)]
pub enum Event<'a, E> {
    /// A candidate was measured.
    Evaluated {
        /// The evaluated point.
        point: Point,

        /// The step that requested the evaluation.
        step: Step,
    },

    /// A candidate could not be measured and was assigned the penalty.
    EvaluationFailed {
        /// The candidate x.
        x: f64,

        /// The step that requested the evaluation.
        step: Step,

        /// Why the candidate failed.
        error: &'a TrialError<E>,
    },

    /// An iteration completed.
    Iterated {
        /// The best point after the iteration.
        record: IterationRecord,

        /// The simplex after the iteration, sorted best first.
        simplex: Simplex,
    },
}

impl<E> Event<'_, E> {
    /// Returns the x value this event is about.
    ///
    /// For [`Event::Iterated`] this is the current best x.
    #[must_use]
    pub fn x(&self) -> f64 {
        match self {
            Self::Evaluated { point, .. } => point.x,
            Self::EvaluationFailed { x, .. } => *x,
            Self::Iterated { record, .. } => record.x,
        }
    }

    /// Returns the step that requested an evaluation, or `None` for [`Event::Iterated`].
    #[must_use]
    pub fn step(&self) -> Option<Step> {
        match self {
            Self::Evaluated { step, .. } | Self::EvaluationFailed { step, .. } => Some(*step),
            Self::Iterated { .. } => None,
        }
    }
}
