//! Error taxonomy for the workout core. Both variants are local, recoverable
//! conditions: the presentation layer shows the message and leaves its
//! current state alone.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkoutError {
    /// A user-supplied field could not be turned into a valid value.
    #[error("{field} {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
    /// Positional access past the end of the workout list.
    #[error("no workout at position {index} (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

impl WorkoutError {
    pub(crate) fn invalid<S: Into<String>>(field: &'static str, reason: S) -> Self {
        WorkoutError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T, E = WorkoutError> = std::result::Result<T, E>;
