use thiserror::Error;

use crate::optimization::DEFAULT_PENALTY;

/// Errors that can occur when validating a Nelder-Mead search.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("max_iters must be at least 1")]
    MaxIters,

    #[error("tolerance must be finite and positive")]
    Tolerance,

    #[error("penalty must be finite and positive")]
    Penalty,

    #[error("reflection coefficient must be finite and positive")]
    Reflection,

    #[error("expansion coefficient must be finite and greater than 1")]
    Expansion,

    #[error("contraction coefficient must lie strictly between 0 and 1")]
    Contraction,

    #[error("shrink coefficient must lie strictly between 0 and 1")]
    Shrink,

    #[error("target must be finite, got {0}")]
    Target(f64),

    #[error("initial guess must be finite and positive, got {0}")]
    InitialGuess(f64),
}

/// The four Nelder-Mead step coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    reflection: f64,
    expansion: f64,
    contraction: f64,
    shrink: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Self {
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

impl Coefficients {
    /// Creates validated coefficients.
    ///
    /// # Errors
    ///
    /// Returns an error if reflection is not positive, expansion is not
    /// greater than 1, or contraction or shrink fall outside `(0, 1)`.
    pub fn new(
        reflection: f64,
        expansion: f64,
        contraction: f64,
        shrink: f64,
    ) -> Result<Self, ConfigError> {
        if !reflection.is_finite() || reflection <= 0.0 {
            return Err(ConfigError::Reflection);
        }
        if !expansion.is_finite() || expansion <= 1.0 {
            return Err(ConfigError::Expansion);
        }
        if !(contraction > 0.0 && contraction < 1.0) {
            return Err(ConfigError::Contraction);
        }
        if !(shrink > 0.0 && shrink < 1.0) {
            return Err(ConfigError::Shrink);
        }

        Ok(Self {
            reflection,
            expansion,
            contraction,
            shrink,
        })
    }

    /// Returns the reflection coefficient (α).
    #[must_use]
    pub fn reflection(&self) -> f64 {
        self.reflection
    }

    /// Returns the expansion coefficient (γ).
    #[must_use]
    pub fn expansion(&self) -> f64 {
        self.expansion
    }

    /// Returns the contraction coefficient (ρ).
    #[must_use]
    pub fn contraction(&self) -> f64 {
        self.contraction
    }

    /// Returns the shrink coefficient (σ).
    #[must_use]
    pub fn shrink(&self) -> f64 {
        self.shrink
    }
}

/// Configuration for the Nelder-Mead solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    tolerance: f64,
    coefficients: Coefficients,
    penalty: f64,
    realize_best: bool,
}

impl Default for Config {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(50, 1e-6).unwrap()
    }
}

impl Config {
    /// Creates a config with default coefficients and penalty.
    ///
    /// The search converges once the best measurement lies within
    /// `tolerance` of the target.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_iters` is zero or `tolerance` is not finite and positive.
    pub fn new(max_iters: usize, tolerance: f64) -> Result<Self, ConfigError> {
        if max_iters == 0 {
            return Err(ConfigError::MaxIters);
        }
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::Tolerance);
        }

        Ok(Self {
            max_iters,
            tolerance,
            coefficients: Coefficients::default(),
            penalty: DEFAULT_PENALTY,
            realize_best: false,
        })
    }

    /// Replaces the step coefficients.
    #[must_use]
    pub fn with_coefficients(mut self, coefficients: Coefficients) -> Self {
        self.coefficients = coefficients;
        self
    }

    /// Replaces the objective assigned to failed candidates.
    ///
    /// # Errors
    ///
    /// Returns an error if `penalty` is not finite and positive.
    pub fn with_penalty(mut self, penalty: f64) -> Result<Self, ConfigError> {
        if !penalty.is_finite() || penalty <= 0.0 {
            return Err(ConfigError::Penalty);
        }
        self.penalty = penalty;
        Ok(self)
    }

    /// Sets whether the oracle is left realized at the best point on completion.
    #[must_use]
    pub fn with_realize_best(mut self, realize_best: bool) -> Self {
        self.realize_best = realize_best;
        self
    }

    /// Returns the iteration limit.
    ///
    /// The search stops once its iteration count passes this limit, so up to
    /// `max_iters + 1` iterations run.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the absolute tolerance on `|measurement - target|`.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the step coefficients.
    #[must_use]
    pub fn coefficients(&self) -> Coefficients {
        self.coefficients
    }

    /// Returns the objective assigned to failed candidates.
    #[must_use]
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Returns whether the best point is realized on completion.
    #[must_use]
    pub fn realize_best(&self) -> bool {
        self.realize_best
    }
}

/// Checks the per-run inputs that are not part of [`Config`].
pub(super) fn validate_run(target: f64, x0: f64) -> Result<(), ConfigError> {
    if !target.is_finite() {
        return Err(ConfigError::Target(target));
    }
    if !x0.is_finite() || x0 <= 0.0 {
        return Err(ConfigError::InitialGuess(x0));
    }
    Ok(())
}
