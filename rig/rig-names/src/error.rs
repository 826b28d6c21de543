//! Error types for shape-name validation.

use thiserror::Error;

/// Result type for name operations.
pub type NameResult<T> = Result<T, NameError>;

/// Errors raised while validating shape-key names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NameError {
    /// The name does not follow the `Base1_Base2_..._BaseN` grammar.
    #[error("invalid shape name '{name}'")]
    InvalidName {
        /// The offending name.
        name: String,
    },

    /// Two correctives reduce to the same set of base components.
    #[error("ambiguous corrective shapes '{first}' and '{second}'")]
    AmbiguousCorrectives {
        /// The first shape of the ambiguous pair, in layer order.
        first: String,
        /// The second shape of the ambiguous pair.
        second: String,
    },
}
