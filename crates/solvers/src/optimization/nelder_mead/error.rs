use std::error::Error as StdError;

use thiserror::Error;

use super::{Solution, config::ConfigError};

/// Errors that can occur during a Nelder-Mead search.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The oracle failed to reset between trials.
    ///
    /// `partial` holds the best point seen before the failure, with
    /// [`Status::OracleUnavailable`](super::Status::OracleUnavailable).
    #[error("oracle unavailable after {} iterations", .partial.iters)]
    OracleUnavailable {
        #[source]
        source: Box<dyn StdError + Send + Sync>,
        partial: Box<Solution>,
    },
}

impl Error {
    /// Returns the best result found before the search failed, if any.
    #[must_use]
    pub fn partial(&self) -> Option<&Solution> {
        match self {
            Self::InvalidConfig(_) => None,
            Self::OracleUnavailable { partial, .. } => Some(partial),
        }
    }
}
