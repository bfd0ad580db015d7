//! Error and diagnostic types.
//!
//! Fatal conditions (bad configuration, malformed tours) are reported as
//! [`AcoError`]. Numeric degeneracies the engine recovers from in place are
//! reported as [`Diagnostic`] values instead.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for colony operations.
pub type Result<T> = std::result::Result<T, AcoError>;

/// Errors produced by the ant colony engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// A parameter or input instance is outside its valid domain.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        /// What was wrong with the input.
        message: String,
    },

    /// A tour with zero or non-finite length reached the pheromone update.
    #[error("degenerate tour: length {length} cannot be used for deposition")]
    DegenerateTour {
        /// The offending tour length.
        length: f64,
    },

    /// A route is not a permutation of the matrix nodes.
    #[error("invalid tour: {reason}")]
    InvalidTour {
        /// Why the route was rejected.
        reason: String,
    },

    /// A node index is not in `0..size`.
    #[error("node index {index} out of bounds for {size} nodes")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of nodes.
        size: usize,
    },
}

impl AcoError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn tour(reason: impl Into<String>) -> Self {
        Self::InvalidTour {
            reason: reason.into(),
        }
    }
}

/// A recovered numeric degeneracy, surfaced for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Every remaining candidate had zero desirability; the lowest-index
    /// unvisited node was chosen.
    DegenerateSelection {
        /// Node the ant was standing on.
        from: usize,
        /// Node selected by the fallback.
        fallback: usize,
    },
    /// An ant's tour had a zero or non-finite length and deposited nothing.
    SkippedDeposit {
        /// Index of the ant within its iteration.
        ant: usize,
        /// The rejected tour length.
        length: f64,
    },
}
