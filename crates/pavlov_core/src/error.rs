//! Error types for schedule compilation

use thiserror::Error;

/// Errors raised while compiling a trial schedule.
///
/// All of them are fatal for the compile call: no partial schedule is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScheduleError {
    /// A block names a trial type other than `F`, `P`, `E`, `R` or `T`.
    /// `found` is `None` when a count appears before any type letter.
    #[error("Invalid schedule type {found:?} at position {position}")]
    InvalidType {
        found: Option<char>,
        position: usize,
    },

    /// Missing, malformed or out-of-range trial count, or an unterminated schedule.
    #[error("Invalid schedule input at position {position}: {reason}")]
    InvalidInput { position: usize, reason: String },

    /// Partial-conditioning probability outside `0.0..=1.0`.
    #[error("Invalid partial-conditioning probability: {0} (expected 0.0..=1.0)")]
    InvalidProbability(f64),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
