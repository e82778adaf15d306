//! The shared error taxonomy.
//!
//! Sub-crates may wrap [`RailError`] as one variant of their own `thiserror`
//! enum, or convert into it via `#[from]`. Both patterns are used across this
//! workspace; prefer whichever keeps the call site's error handling clean.

use thiserror::Error;

/// Errors raised by construction-time validation or runtime invariant checks.
#[derive(Debug, Error)]
pub enum RailError {
    /// A value required to be strictly positive was not.
    #[error("{field} must be strictly positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// A value required to lie in `[0, 1]` did not.
    #[error("{field} must be a probability in [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f64 },

    /// A uid collided with one already registered.
    #[error("duplicate uid: {0}")]
    NotUniqueId(String),

    /// Structural inconsistency between related inputs (route/tour lengths,
    /// mismatched bridging components, unknown references).
    #[error("input mismatch: {0}")]
    InputMismatch(String),

    /// An internal invariant was violated. These are fatal: the caller
    /// should treat this as a bug, not a recoverable condition.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Shorthand result type used throughout the workspace.
pub type RailResult<T> = Result<T, RailError>;

impl RailError {
    pub fn not_positive(field: &'static str, value: f64) -> Self {
        RailError::NotPositive { field, value }
    }

    pub fn not_a_probability(field: &'static str, value: f64) -> Self {
        RailError::NotAProbability { field, value }
    }
}
