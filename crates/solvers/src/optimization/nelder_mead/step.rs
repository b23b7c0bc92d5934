use super::Simplex;

/// The Nelder-Mead step that produced an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Step {
    /// Evaluating a vertex of the starting simplex.
    Init,

    /// Evaluating the reflection of the worst point through the centroid.
    Reflect,

    /// Evaluating a point further along the reflection direction.
    Expand,

    /// Evaluating the contraction between the centroid and the worst point.
    ContractOutside,

    /// Evaluating the contraction on the reflected side of the centroid.
    ContractInside,

    /// Re-evaluating a point pulled toward the best point.
    Shrink,
}

/// Where a reflected objective falls relative to the current simplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Branch {
    /// Between best (inclusive) and second worst: keep the reflection.
    Accept,

    /// Better than the best: try expanding.
    Expand,

    /// Between second worst (inclusive) and worst: contract toward the worst point.
    ContractOutside,

    /// No better than the worst: contract on the reflected side.
    ContractInside,
}

impl Branch {
    /// Classifies a reflected objective against a sorted simplex.
    pub(super) fn classify(simplex: &Simplex, reflected: f64) -> Self {
        let best = simplex.best().objective;
        let second_worst = simplex.second_worst().objective;
        let worst = simplex.worst().objective;

        if best <= reflected && reflected < second_worst {
            Self::Accept
        } else if reflected < best {
            Self::Expand
        } else if second_worst <= reflected && reflected < worst {
            Self::ContractOutside
        } else {
            Self::ContractInside
        }
    }
}
