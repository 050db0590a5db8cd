//! Error taxonomy for scoped query construction.
//!
//! Query building never performs I/O, so only two things can go wrong: the
//! caller passes something that is not a usable argument, or there is no
//! authenticated caller to scope the query to. Both are returned
//! synchronously to the immediate caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// A filter argument could not be interpreted, typically a date string
    /// that is not a calendar date.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No caller identity is available. Visibility cannot be computed, and
    /// defaulting to either "no rows" or "all rows" would hide the problem.
    #[error("Unauthorized: no authenticated user to scope the query to")]
    Unauthorized,
}
