use std::time::Instant;

use shellfit_core::{Observer, Oracle};

use crate::optimization::Objective;

use super::{
    Action, Error, Event, Point, Simplex, Solution, Status, Step,
    search::{EvalOutcome, eval_and_observe},
    simplex::INITIAL_SCALES,
    state::{State, solution_from},
};

pub(super) enum InitResult {
    Continue(State),
    StopEarly(Solution),
}

/// Builds the starting simplex `{x0, 1.1·x0, 1.2·x0}` and evaluates each vertex.
///
/// Failed vertices take the penalty like any other candidate, so init only
/// errors if the oracle cannot be reset between vertices. In that case, and
/// when an observer stops early, the best vertex evaluated so far is reported.
pub(super) fn init<O, Obs>(
    objective: &mut Objective<'_, O>,
    x0: f64,
    observer: &mut Obs,
    started: Instant,
) -> Result<InitResult, Error>
where
    O: Oracle,
    Obs: for<'a> Observer<Event<'a, O::Error>, Action>,
{
    let mut points = Vec::with_capacity(INITIAL_SCALES.len());

    for scale in INITIAL_SCALES {
        let x = scale * x0;
        match eval_and_observe(objective, x, Step::Init, observer) {
            Ok(EvalOutcome::Continue(point)) => points.push(point),
            Ok(EvalOutcome::StopEarly(point)) => {
                points.push(point);
                let best = best_of(&points);
                return Ok(InitResult::StopEarly(solution_from(
                    best,
                    Status::StoppedByObserver,
                    0,
                    objective.evaluations(),
                    started,
                    Vec::new(),
                )));
            }
            Err(err) => {
                let best = if points.is_empty() {
                    Point::failed(x0, objective.penalty())
                } else {
                    best_of(&points)
                };
                let partial = solution_from(
                    best,
                    Status::OracleUnavailable,
                    0,
                    objective.evaluations(),
                    started,
                    Vec::new(),
                );
                return Err(Error::OracleUnavailable {
                    source: Box::new(err),
                    partial: Box::new(partial),
                });
            }
        }
    }

    let simplex = Simplex::new([points[0], points[1], points[2]]);
    Ok(InitResult::Continue(State::new(simplex, started)))
}

/// Returns the lowest-objective point, preferring the earliest on ties.
fn best_of(points: &[Point]) -> Point {
    points
        .iter()
        .copied()
        .reduce(|best, p| if p.objective < best.objective { p } else { best })
        .unwrap_or_else(|| Point::failed(f64::NAN, f64::INFINITY))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::convert::Infallible;

    use approx::assert_relative_eq;
    use thiserror::Error;

    use crate::optimization::DEFAULT_PENALTY;

    /// Measurement equals the candidate.
    struct Identity;

    impl Oracle for Identity {
        type Error = Infallible;
        type ResetError = Infallible;

        fn reset(&mut self) -> Result<(), Self::ResetError> {
            Ok(())
        }

        fn evaluate(&mut self, x: f64) -> Result<f64, Self::Error> {
            Ok(x)
        }
    }

    fn continued(result: InitResult) -> State {
        match result {
            InitResult::Continue(state) => state,
            InitResult::StopEarly(_) => panic!("unexpected stop"),
        }
    }

    #[test]
    fn evaluates_perturbed_vertices() {
        let mut oracle = Identity;
        let mut objective = Objective::new(&mut oracle, 0.0, DEFAULT_PENALTY);

        let mut steps = Vec::new();
        let mut observer = |event: &Event<'_, _>| {
            steps.push((event.x(), event.step()));
            None
        };

        let state = continued(init(&mut objective, 2.0, &mut observer, Instant::now()).unwrap());

        let xs: Vec<f64> = state.simplex().points().iter().map(|p| p.x).collect();
        assert_relative_eq!(xs[0], 2.0);
        assert_relative_eq!(xs[1], 2.2);
        assert_relative_eq!(xs[2], 2.4);
        assert_eq!(steps.len(), 3);
        assert!(steps.iter().all(|(_, step)| *step == Some(Step::Init)));
    }

    #[test]
    fn failed_vertices_take_penalty() {
        #[derive(Debug, Error)]
        #[error("too thick")]
        struct TooThick;

        struct FailsAbove(f64);

        impl Oracle for FailsAbove {
            type Error = TooThick;
            type ResetError = Infallible;

            fn reset(&mut self) -> Result<(), Self::ResetError> {
                Ok(())
            }

            fn evaluate(&mut self, x: f64) -> Result<f64, Self::Error> {
                if x > self.0 { Err(TooThick) } else { Ok(x) }
            }
        }

        let mut oracle = FailsAbove(1.05);
        let mut objective = Objective::new(&mut oracle, 0.0, DEFAULT_PENALTY);

        let state = continued(init(&mut objective, 1.0, &mut (), Instant::now()).unwrap());
        let simplex = state.simplex();

        assert_relative_eq!(simplex.best().x, 1.0);
        assert!(simplex.second_worst().is_failed());
        assert!(simplex.worst().is_failed());
        assert_relative_eq!(simplex.worst().objective, DEFAULT_PENALTY);
    }

    #[test]
    fn observer_can_stop_during_init() {
        let mut oracle = Identity;
        let mut objective = Objective::new(&mut oracle, 0.0, DEFAULT_PENALTY);

        let mut count = 0;
        let mut observer = |_: &Event<'_, _>| {
            count += 1;
            (count == 2).then_some(Action::StopEarly)
        };

        let result = init(&mut objective, 1.0, &mut observer, Instant::now()).unwrap();

        let InitResult::StopEarly(solution) = result else {
            panic!("expected stop");
        };
        assert_eq!(solution.status, Status::StoppedByObserver);
        assert_eq!(solution.evaluations, 2);
        assert_relative_eq!(solution.x, 1.0);
    }

    #[test]
    fn reset_failure_reports_partial() {
        #[derive(Debug, Error)]
        #[error("undo failed")]
        struct UndoFailed;

        struct NoUndo;

        impl Oracle for NoUndo {
            type Error = Infallible;
            type ResetError = UndoFailed;

            fn reset(&mut self) -> Result<(), Self::ResetError> {
                Err(UndoFailed)
            }

            fn evaluate(&mut self, x: f64) -> Result<f64, Self::Error> {
                Ok(x)
            }
        }

        let mut oracle = NoUndo;
        let mut objective = Objective::new(&mut oracle, 0.0, DEFAULT_PENALTY);

        let err = init(&mut objective, 3.0, &mut (), Instant::now())
            .err()
            .expect("reset should fail");

        let Error::OracleUnavailable { partial, .. } = err else {
            panic!("expected oracle unavailable");
        };
        assert_eq!(partial.status, Status::OracleUnavailable);
        assert_eq!(partial.evaluations, 1);
        assert_relative_eq!(partial.x, 3.0);
    }
}
