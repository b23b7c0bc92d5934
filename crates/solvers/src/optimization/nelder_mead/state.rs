use std::time::Instant;

use super::{IterationRecord, Point, Simplex, Solution, Status};

/// Mutable bookkeeping for one search run.
///
/// The simplex itself is only ever replaced, never edited in place.
pub(super) struct State {
    simplex: Simplex,
    history: Vec<IterationRecord>,
    started: Instant,
}

impl State {
    pub(super) fn new(simplex: Simplex, started: Instant) -> Self {
        Self {
            simplex: simplex.sorted(),
            history: Vec::new(),
            started,
        }
    }

    /// Returns the current simplex, sorted best first.
    pub(super) fn simplex(&self) -> Simplex {
        self.simplex
    }

    /// Replaces the simplex and records the iteration.
    pub(super) fn advance(&mut self, next: Simplex, iter: usize) -> IterationRecord {
        self.simplex = next.sorted();
        let record = IterationRecord::new(iter, self.simplex.best());
        self.history.push(record);
        record
    }

    pub(super) fn is_converged(&self, target: f64, tolerance: f64) -> bool {
        self.simplex
            .best()
            .deviation(target)
            .is_some_and(|d| d < tolerance)
    }

    /// Builds a solution for a search cut short mid-iteration.
    ///
    /// `best_seen` is the best point evaluated during the unfinished iteration,
    /// which may beat every point in the simplex.
    pub(super) fn into_interrupted(
        self,
        best_seen: Point,
        status: Status,
        iters: usize,
        evaluations: usize,
    ) -> Solution {
        let best = self.simplex.best();
        let best = if best_seen.objective < best.objective {
            best_seen
        } else {
            best
        };
        solution_from(best, status, iters, evaluations, self.started, self.history)
    }

    pub(super) fn into_solution(self, status: Status, iters: usize, evaluations: usize) -> Solution {
        solution_from(
            self.simplex.best(),
            status,
            iters,
            evaluations,
            self.started,
            self.history,
        )
    }
}

pub(super) fn solution_from(
    best: Point,
    status: Status,
    iters: usize,
    evaluations: usize,
    started: Instant,
    history: Vec<IterationRecord>,
) -> Solution {
    Solution {
        status,
        x: best.x,
        measurement: best.measurement,
        objective: best.objective,
        iters,
        evaluations,
        elapsed: started.elapsed(),
        history,
    }
}
