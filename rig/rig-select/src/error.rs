//! Error types for selection parameters.

use thiserror::Error;

/// Result type for selection operations.
pub type SelectResult<T> = Result<T, SelectError>;

/// Errors that can occur while parsing selection parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SelectError {
    /// The falloff name is not one of SPIKE, BELL, DOME, LINEAR, RANDOM.
    #[error("unknown falloff '{name}'")]
    UnknownFalloff {
        /// The unrecognised name.
        name: String,
    },

    /// The side name is not `left` or `right`.
    #[error("unknown side '{name}' (expected 'left' or 'right')")]
    UnknownSide {
        /// The unrecognised name.
        name: String,
    },
}
