use super::Point;

/// Multipliers applied to the initial guess to build the starting simplex.
pub(super) const INITIAL_SCALES: [f64; 3] = [1.0, 1.1, 1.2];

/// A three-point simplex over a single variable.
///
/// Every operation returns a new simplex; the points of an existing simplex
/// never change. After [`sorted`](Self::sorted) the first point is the best
/// (lowest objective) and the last point is the worst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simplex {
    points: [Point; 3],
}

impl Simplex {
    /// Creates a simplex from three evaluated points, in the given order.
    #[must_use]
    pub fn new(points: [Point; 3]) -> Self {
        Self { points }
    }

    /// Returns the points in their current order.
    #[must_use]
    pub fn points(&self) -> &[Point; 3] {
        &self.points
    }

    /// Returns the points ordered by ascending objective.
    ///
    /// The sort is stable, so tied points keep their current relative order.
    #[must_use]
    pub fn sorted(&self) -> Self {
        let mut points = self.points;
        points.sort_by(|a, b| a.objective.total_cmp(&b.objective));
        Self { points }
    }

    /// Returns the first point, which is the best once sorted.
    #[must_use]
    pub fn best(&self) -> Point {
        self.points[0]
    }

    /// Returns the middle point, which is the second worst once sorted.
    #[must_use]
    pub fn second_worst(&self) -> Point {
        self.points[1]
    }

    /// Returns the last point, which is the worst once sorted.
    #[must_use]
    pub fn worst(&self) -> Point {
        self.points[2]
    }

    /// Returns the mean x of every point except the last.
    #[must_use]
    pub fn centroid(&self) -> f64 {
        0.5 * (self.points[0].x + self.points[1].x)
    }

    /// Returns a simplex with the last point replaced.
    #[must_use]
    pub fn with_worst(&self, point: Point) -> Self {
        let [best, second, _] = self.points;
        Self {
            points: [best, second, point],
        }
    }

    /// Returns the x values the non-best points move to when shrinking by `sigma`.
    #[must_use]
    pub fn shrink_targets(&self, sigma: f64) -> [f64; 2] {
        let best = self.points[0].x;
        [
            best + sigma * (self.points[1].x - best),
            best + sigma * (self.points[2].x - best),
        ]
    }

    /// Returns the distance between the smallest and largest x.
    #[must_use]
    pub fn spread(&self) -> f64 {
        let (lo, hi) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.x), hi.max(p.x))
            });
        hi - lo
    }
}
