use approx::assert_relative_eq;
use thiserror::Error;

use shellfit_core::Oracle;

use crate::optimization::DEFAULT_PENALTY;

use super::{Action, Config, ConfigError, Error, Event, Status, Step, run, run_unobserved};

#[derive(Debug, Error)]
#[error("shell feature failed at {0} mm")]
struct ShellFailed(f64);

#[derive(Debug, Error)]
#[error("could not undo shell feature")]
struct UndoFailed;

/// A synthetic modeling engine that records every call.
struct Synthetic {
    measure: fn(f64) -> Option<f64>,
    calls: Vec<f64>,
    resets: usize,
    fail_call: Option<usize>,
    fail_reset: Option<usize>,
}

impl Synthetic {
    fn new(measure: fn(f64) -> Option<f64>) -> Self {
        Self {
            measure,
            calls: Vec::new(),
            resets: 0,
            fail_call: None,
            fail_reset: None,
        }
    }

    /// Shell mass falls linearly with thickness until 3 mm.
    fn shell_mass() -> Self {
        Self::new(|x| Some(0.05 - 0.01 * x.min(3.0)))
    }
}

impl Oracle for Synthetic {
    type Error = ShellFailed;
    type ResetError = UndoFailed;

    fn reset(&mut self) -> Result<(), Self::ResetError> {
        self.resets += 1;
        if self.fail_reset == Some(self.resets) {
            return Err(UndoFailed);
        }
        Ok(())
    }

    fn evaluate(&mut self, x: f64) -> Result<f64, Self::Error> {
        self.calls.push(x);
        if self.fail_call == Some(self.calls.len()) {
            return Err(ShellFailed(x));
        }
        (self.measure)(x).ok_or(ShellFailed(x))
    }
}

const TARGET: f64 = 0.045;
const X0: f64 = 1.5;

fn scenario_config() -> Config {
    Config::new(50, 0.003).unwrap()
}

#[test]
fn shell_mass_scenario_converges() {
    let mut oracle = Synthetic::shell_mass();

    let solution = run_unobserved(&mut oracle, TARGET, X0, &scenario_config()).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert!((solution.x - 0.5).abs() < 0.3, "x = {}", solution.x);
    assert!((solution.measurement.unwrap() - TARGET).abs() < 0.003);
    assert_eq!(solution.history.len(), solution.iters);
    assert_eq!(solution.evaluations, oracle.calls.len());
    assert_eq!(oracle.resets, oracle.calls.len() - 1);
}

#[test]
fn shell_mass_scenario_takes_expected_steps() {
    // Init: 1.5, 1.65, 1.8. Both iterations reflect past the best point and
    // accept the expansion: 1.35 → 1.125, then 0.975 → 0.6375.
    let mut oracle = Synthetic::shell_mass();

    let mut steps = Vec::new();
    let observer = |event: &Event<'_, _>| {
        if let Some(step) = event.step() {
            steps.push(step);
        }
        None
    };

    let solution = run(&mut oracle, TARGET, X0, &scenario_config(), observer).unwrap();

    assert_eq!(solution.iters, 2);
    assert_eq!(
        steps,
        vec![
            Step::Init,
            Step::Init,
            Step::Init,
            Step::Reflect,
            Step::Expand,
            Step::Reflect,
            Step::Expand,
        ]
    );
    assert_relative_eq!(solution.history[0].x, 1.125, epsilon = 1e-12);
    assert_relative_eq!(solution.x, 0.6375, epsilon = 1e-12);
}

#[test]
fn always_failing_oracle_exhausts_budget() {
    let mut oracle = Synthetic::new(|_| None);

    let solution = run_unobserved(&mut oracle, TARGET, X0, &scenario_config()).unwrap();

    // The counter starts at zero and the search stops once it passes 50.
    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.iters, 51);
    assert!(solution.measurement.is_none());
    assert_relative_eq!(solution.objective, DEFAULT_PENALTY);
    assert_eq!(solution.history.len(), 51);
    assert!(
        solution
            .history
            .iter()
            .all(|r| r.objective == DEFAULT_PENALTY && r.measurement.is_none())
    );

    // Every iteration reflects, contracts, then shrinks both non-best points.
    assert_eq!(solution.evaluations, 3 + 51 * 4);
}

#[test]
fn single_failure_does_not_abort() {
    // The fourth call is the first reflection.
    let mut oracle = Synthetic::shell_mass();
    oracle.fail_call = Some(4);

    let mut failures = 0;
    let observer = |event: &Event<'_, _>| {
        if matches!(event, Event::EvaluationFailed { .. }) {
            failures += 1;
        }
        None
    };

    let solution = run(&mut oracle, TARGET, X0, &scenario_config(), observer).unwrap();

    assert_eq!(failures, 1);
    assert_eq!(solution.status, Status::Converged);
    assert!((solution.measurement.unwrap() - TARGET).abs() < 0.003);
}

#[test]
fn contraction_evaluates_contracted_point() {
    // With the first reflection failing, the search must contract on the
    // reflected side of the centroid: 1.575 - 0.5 * (1.8 - 1.575).
    let mut oracle = Synthetic::shell_mass();
    oracle.fail_call = Some(4);

    let config = Config::new(1, 0.003).unwrap();
    let solution = run_unobserved(&mut oracle, TARGET, X0, &config).unwrap();

    assert_relative_eq!(oracle.calls[4], 1.4625, epsilon = 1e-12);
    assert_relative_eq!(solution.history[0].x, 1.4625, epsilon = 1e-12);
}

#[test]
fn budget_allows_one_iteration_past_max_iters() {
    let mut oracle = Synthetic::new(|_| None);
    let config = Config::new(3, 0.003).unwrap();

    let solution = run_unobserved(&mut oracle, TARGET, X0, &config).unwrap();

    assert_eq!(solution.status, Status::MaxIters);
    assert_eq!(solution.iters, 4);
    assert_eq!(solution.history.len(), 4);
    assert_eq!(oracle.calls.len(), 3 + 4 * 4);
}

/// Stops after the first iteration and returns the steps and resulting simplex.
fn first_iteration(oracle: &mut Synthetic) -> (Vec<Step>, [f64; 3]) {
    let mut steps = Vec::new();
    let mut kept = [f64::NAN; 3];
    let observer = |event: &Event<'_, _>| match event {
        Event::Iterated { simplex, .. } => {
            let points = *simplex.points();
            kept = points.map(|p| p.x);
            Some(Action::StopEarly)
        }
        _ => {
            steps.extend(event.step());
            None
        }
    };

    let config = Config::new(10, 1e-9).unwrap();
    run(oracle, 0.0, X0, &config, observer).unwrap();
    (steps, kept)
}

#[test]
fn rejected_expansion_keeps_reflected_point() {
    // Objective (x - 1.3)²: the reflection at 1.35 beats the best vertex but
    // the expansion to 1.125 overshoots.
    let mut oracle = Synthetic::new(|x| Some(x - 1.3));

    let (steps, kept) = first_iteration(&mut oracle);

    assert_eq!(steps[3..], [Step::Reflect, Step::Expand]);
    assert_eq!(oracle.calls.len(), 5);
    assert_relative_eq!(oracle.calls[3], 1.35, epsilon = 1e-12);
    assert_relative_eq!(oracle.calls[4], 1.125, epsilon = 1e-12);
    assert_relative_eq!(kept[0], 1.35, epsilon = 1e-12);
    assert_relative_eq!(kept[1], 1.5, epsilon = 1e-12);
    assert_relative_eq!(kept[2], 1.65, epsilon = 1e-12);
}

#[test]
fn outside_contraction_replaces_worst() {
    // Objective (x - 1.55)²: the reflection at 1.35 lands between the second
    // worst (1.65) and worst (1.8), so the search contracts toward 1.8.
    let mut oracle = Synthetic::new(|x| Some(x - 1.55));

    let (steps, kept) = first_iteration(&mut oracle);

    assert_eq!(steps[3..], [Step::Reflect, Step::ContractOutside]);
    assert_relative_eq!(oracle.calls[3], 1.35, epsilon = 1e-12);
    // 1.575 + 0.5 * (1.8 - 1.575)
    assert_relative_eq!(oracle.calls[4], 1.6875, epsilon = 1e-12);
    assert_relative_eq!(kept[0], 1.5, epsilon = 1e-12);
    assert_relative_eq!(kept[1], 1.65, epsilon = 1e-12);
    assert_relative_eq!(kept[2], 1.6875, epsilon = 1e-12);
}

#[test]
fn failed_outside_contraction_shrinks_toward_best() {
    let mut oracle = Synthetic::new(|x| Some(x - 1.55));
    oracle.fail_call = Some(5);

    let (steps, kept) = first_iteration(&mut oracle);

    assert_eq!(
        steps[3..],
        [Step::Reflect, Step::ContractOutside, Step::Shrink, Step::Shrink]
    );
    assert_relative_eq!(oracle.calls[4], 1.6875, epsilon = 1e-12);
    assert_relative_eq!(oracle.calls[5], 1.575, epsilon = 1e-12);
    assert_relative_eq!(oracle.calls[6], 1.65, epsilon = 1e-12);
    // The shrunk point at 1.575 is closer to 1.55 than the old best.
    assert_relative_eq!(kept[0], 1.575, epsilon = 1e-12);
    assert_relative_eq!(kept[1], 1.5, epsilon = 1e-12);
    assert_relative_eq!(kept[2], 1.65, epsilon = 1e-12);
}

#[test]
fn converges_on_noiseless_quadratic() {
    // measurement = (x - 2)² + 1, so the target of 1 is met at x = 2.
    let mut oracle = Synthetic::new(|x| Some((x - 2.0).powi(2) + 1.0));
    let config = Config::new(50, 1e-3).unwrap();

    let solution = run_unobserved(&mut oracle, 1.0, 1.5, &config).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert!((solution.measurement.unwrap() - 1.0).abs() < 1e-3);
    assert!(solution.iters <= 50);
}

#[test]
fn reset_failure_during_init_aborts() {
    let mut oracle = Synthetic::shell_mass();
    oracle.fail_reset = Some(2);

    let err = run_unobserved(&mut oracle, TARGET, X0, &scenario_config()).unwrap_err();

    let Error::OracleUnavailable { partial, .. } = err else {
        panic!("expected oracle unavailable");
    };
    assert_eq!(partial.status, Status::OracleUnavailable);
    assert_eq!(partial.iters, 0);
    assert_eq!(oracle.calls.len(), 2);
}

#[test]
fn reset_failure_mid_search_stops_evaluating() {
    // Resets 1-4 succeed (init and the first iteration), the fifth fails.
    let mut oracle = Synthetic::shell_mass();
    oracle.fail_reset = Some(5);

    let err = run_unobserved(&mut oracle, TARGET, X0, &scenario_config()).unwrap_err();

    let partial = err.partial().expect("partial result");
    assert_eq!(partial.status, Status::OracleUnavailable);
    assert_eq!(partial.iters, 1);
    assert_eq!(partial.history.len(), 1);
    assert_relative_eq!(partial.x, 1.125, epsilon = 1e-12);
    assert_eq!(oracle.calls.len(), 5);
}

#[test]
fn reset_failure_reports_unkept_reflection() {
    // Resets 1-3 cover init and the first reflection; the fourth, before the
    // expansion, fails. The reflection at 1.35 beats every vertex.
    let mut oracle = Synthetic::shell_mass();
    oracle.fail_reset = Some(4);

    let err = run_unobserved(&mut oracle, TARGET, X0, &scenario_config()).unwrap_err();

    let partial = err.partial().expect("partial result");
    assert_eq!(partial.status, Status::OracleUnavailable);
    assert_eq!(partial.iters, 0);
    assert_eq!(oracle.calls.len(), 4);
    assert_relative_eq!(partial.x, 1.35, epsilon = 1e-12);
    assert_relative_eq!(partial.objective, 0.0085_f64.powi(2), epsilon = 1e-12);
}

#[test]
fn invalid_initial_guess_evaluates_nothing() {
    let mut oracle = Synthetic::shell_mass();

    for x0 in [0.0, -1.0, f64::NAN] {
        let err = run_unobserved(&mut oracle, TARGET, x0, &scenario_config()).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig(ConfigError::InitialGuess(_))
        ));
    }

    let err = run_unobserved(&mut oracle, f64::INFINITY, X0, &scenario_config()).unwrap_err();
    assert!(matches!(err, Error::InvalidConfig(ConfigError::Target(_))));
    assert!(err.partial().is_none());

    assert!(oracle.calls.is_empty());
    assert_eq!(oracle.resets, 0);
}

#[test]
fn non_positive_candidates_never_reach_oracle() {
    // Measurement equals thickness and the target is unreachable below zero,
    // so reflections and expansions soon cross zero.
    let mut oracle = Synthetic::new(Some);
    let config = Config::new(30, 1e-6).unwrap();

    let mut rejected = 0;
    let observer = |event: &Event<'_, _>| {
        if let Event::EvaluationFailed { x, .. } = event {
            assert!(*x <= 0.0);
            rejected += 1;
        }
        None
    };

    let solution = run(&mut oracle, -1.0, 1.0, &config, observer).unwrap();

    assert_eq!(solution.status, Status::MaxIters);
    assert!(rejected > 0);
    assert!(oracle.calls.iter().all(|&x| x > 0.0));
    assert!(solution.x > 0.0);
}

#[test]
fn observer_can_stop_after_iteration() {
    let mut oracle = Synthetic::shell_mass();

    let observer = |event: &Event<'_, _>| match event {
        Event::Iterated { record, .. } if record.iter == 1 => Some(Action::StopEarly),
        _ => None,
    };

    let solution = run(&mut oracle, TARGET, X0, &scenario_config(), observer).unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.iters, 1);
    assert_relative_eq!(solution.x, 1.125, epsilon = 1e-12);
}

#[test]
fn observer_can_stop_mid_iteration() {
    let mut oracle = Synthetic::shell_mass();

    let observer = |event: &Event<'_, _>| {
        (event.step() == Some(Step::Expand)).then_some(Action::StopEarly)
    };

    let solution = run(&mut oracle, TARGET, X0, &scenario_config(), observer).unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    // The expansion at 1.125 was measured before the stop and is the best so far.
    assert_eq!(solution.iters, 0);
    assert_relative_eq!(solution.x, 1.125, epsilon = 1e-12);
    assert_eq!(solution.evaluations, 5);
}

#[test]
fn assume_worse_keeps_search_out_of_region() {
    let mut oracle = Synthetic::shell_mass();
    let config = Config::new(20, 0.003).unwrap();

    let observer = |event: &Event<'_, _>| match event {
        Event::Evaluated { point, .. } if point.x < 1.0 => Some(Action::AssumeWorse),
        _ => None,
    };

    let solution = run(&mut oracle, TARGET, X0, &config, observer).unwrap();

    assert_eq!(solution.status, Status::MaxIters);
    assert!(solution.x >= 1.0, "x = {}", solution.x);
    assert!(solution.history.iter().all(|r| r.x >= 1.0));
}

#[test]
fn iteration_events_match_history() {
    let mut oracle = Synthetic::shell_mass();

    let mut records = Vec::new();
    let observer = |event: &Event<'_, _>| {
        if let Event::Iterated { record, simplex } = event {
            assert_eq!(simplex.best().x, record.x);
            records.push(*record);
        }
        None
    };

    let solution = run(&mut oracle, TARGET, X0, &scenario_config(), observer).unwrap();

    assert_eq!(records, solution.history);
    assert!(records.iter().enumerate().all(|(i, r)| r.iter == i + 1));
}

#[test]
fn best_objective_never_worsens() {
    let mut oracle = Synthetic::new(|x| Some((x - 2.0).powi(2) + 1.0));
    let config = Config::new(25, 1e-9).unwrap();

    let solution = run_unobserved(&mut oracle, 1.0, 0.7, &config).unwrap();

    assert!(
        solution
            .history
            .windows(2)
            .all(|w| w[1].objective <= w[0].objective)
    );
}

#[test]
fn runs_are_deterministic() {
    let first = run_unobserved(&mut Synthetic::shell_mass(), TARGET, X0, &scenario_config()).unwrap();
    let second =
        run_unobserved(&mut Synthetic::shell_mass(), TARGET, X0, &scenario_config()).unwrap();

    assert_eq!(first.history, second.history);
    assert_eq!(first.evaluations, second.evaluations);
}

#[test]
fn realize_best_leaves_oracle_at_best_point() {
    let mut oracle = Synthetic::shell_mass();
    let config = scenario_config().with_realize_best(true);

    let solution = run_unobserved(&mut oracle, TARGET, X0, &config).unwrap();

    assert_eq!(solution.status, Status::Converged);
    assert_eq!(solution.evaluations, 8);
    assert_eq!(oracle.calls.last().copied(), Some(solution.x));
    assert_eq!(oracle.resets, 7);
}

#[test]
fn realize_best_reset_failure_is_reported() {
    // The run itself needs six resets; the seventh is the realize step.
    let mut oracle = Synthetic::shell_mass();
    oracle.fail_reset = Some(7);
    let config = scenario_config().with_realize_best(true);

    let err = run_unobserved(&mut oracle, TARGET, X0, &config).unwrap_err();

    let partial = err.partial().expect("partial result");
    assert_eq!(partial.status, Status::OracleUnavailable);
    assert_eq!(partial.iters, 2);
    assert_relative_eq!(partial.x, 0.6375, epsilon = 1e-12);
}
