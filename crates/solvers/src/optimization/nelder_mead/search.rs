use std::time::Instant;

use tracing::{debug, info, info_span};

use shellfit_core::{Observer, Oracle};

use crate::optimization::{Objective, Trial};

use super::{
    Action, Coefficients, Config, Error, Event, Point, Simplex, Solution, Status, Step,
    config::validate_run,
    init::{InitResult, init},
    step::Branch,
};

/// Core Nelder-Mead search implementation.
pub(super) fn search<O, Obs>(
    oracle: &mut O,
    target: f64,
    x0: f64,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    O: Oracle,
    Obs: for<'a> Observer<Event<'a, O::Error>, Action>,
{
    validate_run(target, x0)?;

    let _span = info_span!("nelder_mead", target, x0).entered();
    let started = Instant::now();
    let mut objective = Objective::new(oracle, target, config.penalty());

    let mut state = match init(&mut objective, x0, &mut observer, started)? {
        InitResult::Continue(state) => state,
        InitResult::StopEarly(solution) => return finish(&mut objective, solution, config),
    };

    let coefficients = config.coefficients();
    let last_iter = config.max_iters().saturating_add(1);

    for iter in 1..=last_iter {
        let mut trials = Trials::new(&mut objective, &mut observer, state.simplex().best());
        let outcome = iterate(&mut trials, state.simplex(), &coefficients);
        let best_seen = trials.best;

        let next = match outcome {
            Ok(Some(next)) => next,
            Ok(None) => {
                let solution = state.into_interrupted(
                    best_seen,
                    Status::StoppedByObserver,
                    iter - 1,
                    objective.evaluations(),
                );
                return finish(&mut objective, solution, config);
            }
            Err(err) => {
                let partial = state.into_interrupted(
                    best_seen,
                    Status::OracleUnavailable,
                    iter - 1,
                    objective.evaluations(),
                );
                return Err(Error::OracleUnavailable {
                    source: Box::new(err),
                    partial: Box::new(partial),
                });
            }
        };

        let record = state.advance(next, iter);
        debug!(
            iter,
            x = record.x,
            measurement = ?record.measurement,
            objective = record.objective,
            "iteration complete"
        );

        let action = observer.observe(&Event::Iterated {
            record,
            simplex: state.simplex(),
        });

        if state.is_converged(target, config.tolerance()) {
            let solution = state.into_solution(Status::Converged, iter, objective.evaluations());
            return finish(&mut objective, solution, config);
        }
        if let Some(Action::StopEarly) = action {
            let solution =
                state.into_solution(Status::StoppedByObserver, iter, objective.evaluations());
            return finish(&mut objective, solution, config);
        }
    }

    // The counter has passed `max_iters`.
    let solution = state.into_solution(Status::MaxIters, last_iter, objective.evaluations());
    finish(&mut objective, solution, config)
}

/// Evaluates the candidates of one iteration and remembers the best point seen.
///
/// The best point covers candidates the iteration never got to keep, so a
/// search interrupted mid-iteration still reports everything it measured.
struct Trials<'a, 'o, O, Obs> {
    objective: &'a mut Objective<'o, O>,
    observer: &'a mut Obs,
    best: Point,
}

impl<'a, 'o, O, Obs> Trials<'a, 'o, O, Obs>
where
    O: Oracle,
    Obs: for<'e> Observer<Event<'e, O::Error>, Action>,
{
    fn new(objective: &'a mut Objective<'o, O>, observer: &'a mut Obs, best: Point) -> Self {
        Self {
            objective,
            observer,
            best,
        }
    }

    /// Returns the evaluated point, or `None` if the observer stopped the search.
    fn eval(&mut self, x: f64, step: Step) -> Result<Option<Point>, O::ResetError> {
        let outcome = eval_and_observe(self.objective, x, step, self.observer)?;
        let point = outcome.point();
        if point.objective < self.best.objective {
            self.best = point;
        }
        Ok(outcome.proceed())
    }
}

/// Performs one Nelder-Mead iteration on a sorted simplex.
///
/// Returns `Ok(None)` if the observer stopped the search mid-iteration.
fn iterate<O, Obs>(
    trials: &mut Trials<'_, '_, O, Obs>,
    simplex: Simplex,
    coefficients: &Coefficients,
) -> Result<Option<Simplex>, O::ResetError>
where
    O: Oracle,
    Obs: for<'a> Observer<Event<'a, O::Error>, Action>,
{
    let centroid = simplex.centroid();
    let worst = simplex.worst();

    let x_reflect = centroid + coefficients.reflection() * (centroid - worst.x);
    let Some(reflected) = trials.eval(x_reflect, Step::Reflect)? else {
        return Ok(None);
    };

    let branch = Branch::classify(&simplex, reflected.objective);
    debug!(?branch, centroid, reflected = reflected.x, "reflected");

    match branch {
        Branch::Accept => Ok(Some(simplex.with_worst(reflected))),

        Branch::Expand => {
            let x_expand = centroid + coefficients.expansion() * (reflected.x - centroid);
            let Some(expanded) = trials.eval(x_expand, Step::Expand)? else {
                return Ok(None);
            };
            let keep = if expanded.objective < reflected.objective {
                expanded
            } else {
                reflected
            };
            Ok(Some(simplex.with_worst(keep)))
        }

        Branch::ContractOutside => {
            let x_contract = centroid + coefficients.contraction() * (worst.x - centroid);
            contract_or_shrink(trials, simplex, x_contract, Step::ContractOutside, coefficients)
        }

        Branch::ContractInside => {
            let x_contract = centroid - coefficients.contraction() * (worst.x - centroid);
            contract_or_shrink(trials, simplex, x_contract, Step::ContractInside, coefficients)
        }
    }
}

/// Evaluates a contraction candidate and keeps it if it beats the worst point.
///
/// Otherwise the whole simplex shrinks toward the best point.
fn contract_or_shrink<O, Obs>(
    trials: &mut Trials<'_, '_, O, Obs>,
    simplex: Simplex,
    x_contract: f64,
    step: Step,
    coefficients: &Coefficients,
) -> Result<Option<Simplex>, O::ResetError>
where
    O: Oracle,
    Obs: for<'a> Observer<Event<'a, O::Error>, Action>,
{
    let Some(contracted) = trials.eval(x_contract, step)? else {
        return Ok(None);
    };

    if contracted.objective < simplex.worst().objective {
        return Ok(Some(simplex.with_worst(contracted)));
    }

    let best = simplex.best();
    let [x_a, x_b] = simplex.shrink_targets(coefficients.shrink());
    debug!(best = best.x, x_a, x_b, "shrinking");

    let Some(a) = trials.eval(x_a, Step::Shrink)? else {
        return Ok(None);
    };
    let Some(b) = trials.eval(x_b, Step::Shrink)? else {
        return Ok(None);
    };

    Ok(Some(Simplex::new([best, a, b])))
}

/// Leaves the oracle realized at the best point if configured, then logs the result.
fn finish<O: Oracle>(
    objective: &mut Objective<'_, O>,
    mut solution: Solution,
    config: &Config,
) -> Result<Solution, Error> {
    if config.realize_best() {
        match objective.evaluate(solution.x) {
            Ok(Trial::Measured { measurement, .. }) => {
                debug!(x = solution.x, measurement, "realized best point");
            }
            // The adapter already logged the failure; the cached result stands.
            Ok(Trial::Failed { .. }) => {}
            Err(err) => {
                solution.status = Status::OracleUnavailable;
                solution.evaluations = objective.evaluations();
                return Err(Error::OracleUnavailable {
                    source: Box::new(err),
                    partial: Box::new(solution),
                });
            }
        }
        solution.evaluations = objective.evaluations();
    }

    info!(
        status = ?solution.status,
        x = solution.x,
        measurement = ?solution.measurement,
        iters = solution.iters,
        evaluations = solution.evaluations,
        elapsed = ?solution.elapsed,
        "search finished"
    );
    Ok(solution)
}

// ============================================================================
// Eval + observe helper
// ============================================================================

pub(super) enum EvalOutcome {
    Continue(Point),
    StopEarly(Point),
}

impl EvalOutcome {
    /// Returns the evaluated point, whatever the observer decided.
    fn point(&self) -> Point {
        match self {
            Self::Continue(point) | Self::StopEarly(point) => *point,
        }
    }

    /// Returns the point to continue with, or `None` if the search should stop.
    fn proceed(self) -> Option<Point> {
        match self {
            Self::Continue(point) => Some(point),
            Self::StopEarly(_) => None,
        }
    }
}

/// Evaluate at `x`, emit event, and handle observer action.
pub(super) fn eval_and_observe<O, Obs>(
    objective: &mut Objective<'_, O>,
    x: f64,
    step: Step,
    observer: &mut Obs,
) -> Result<EvalOutcome, O::ResetError>
where
    O: Oracle,
    Obs: for<'a> Observer<Event<'a, O::Error>, Action>,
{
    let trial = objective.evaluate(x)?;
    let point = Point::from(&trial);

    let action = match &trial {
        Trial::Measured { .. } => observer.observe(&Event::Evaluated { point, step }),
        Trial::Failed { error, .. } => {
            observer.observe(&Event::EvaluationFailed { x, step, error })
        }
    };

    match action {
        Some(Action::StopEarly) => Ok(EvalOutcome::StopEarly(point)),
        Some(Action::AssumeWorse) => Ok(EvalOutcome::Continue(Point::failed(
            x,
            objective.penalty(),
        ))),
        None => Ok(EvalOutcome::Continue(point)),
    }
}
