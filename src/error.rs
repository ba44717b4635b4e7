//! Errors reported by the solver before or while it runs.
//!
//! Numerical trouble inside the iteration (an ill-conditioned spectral step,
//! a failed line search, a non-descent direction) is never an error: it is
//! reported through [`Termination`](crate::spg::Termination) alongside the
//! best point found.

use thiserror::Error;

/// Errors produced by [`spg`](crate::spg::spg) and the provided projections.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpgError {
    /// A configuration value is outside its valid range.
    #[error("Invalid option `{name}`: {reason}")]
    InvalidOption {
        /// Name of the offending field of `SpgOptions`.
        name: &'static str,
        /// What the value is required to satisfy.
        reason: &'static str,
    },

    /// The initial point has no coordinates.
    #[error("Initial point must have at least one coordinate")]
    EmptyProblem,

    /// An oracle returned a vector whose length differs from the problem dimension.
    #[error("{oracle} oracle returned a vector of length {got}, expected {expected}")]
    DimensionMismatch {
        /// Which oracle misbehaved, `"objective"` or `"projection"`.
        oracle: &'static str,
        expected: usize,
        got: usize,
    },

    /// Box constraints were constructed from inconsistent bounds.
    #[error("Invalid bounds: {0}")]
    InvalidBounds(&'static str),
}
