//! Uniform error taxonomy for the matching pipeline.
//!
//! Every fallible entry point in this crate returns [`Error`]. The variants
//! mirror the taxonomy a host embedding this crate is expected to translate
//! back to its own error conventions: an [`Error::Host`] is a verbatim
//! passthrough of whatever the candidate producer raised and must never be
//! reinterpreted, while the other variants originate inside this crate.

use thiserror::Error as ThisError;

/// The single error type returned by every fallible operation in this crate.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Rejected at the boundary: a caller-supplied argument is malformed
    /// (e.g. an unrecognized [`crate::substring::MatchMode`] or
    /// [`crate::highlight::HighlightMode`] string).
    #[error("invalid argument: {0}")]
    Argument(String),

    /// A configuration value is internally inconsistent, e.g. a
    /// `query_inverting_delimiter` longer than one code point.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The candidate producer raised while being pulled. Surfaced verbatim;
    /// never translated or wrapped further.
    #[error("host error: {0}")]
    Host(String),

    /// An internal invariant was violated — most commonly the highlight
    /// second pass failing to reproduce a match that already succeeded once.
    /// Indicates a bug in this crate, not in the caller.
    #[error("internal invariant violated: {0}")]
    Invariant(String),

    /// A worker thread panicked while matching. The driver joins every
    /// worker before re-raising the first such error it observes.
    #[error("worker error: {0}")]
    Worker(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
