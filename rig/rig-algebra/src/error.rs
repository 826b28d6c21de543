//! Error types for shape algebra.

use rig_types::MeshError;
use thiserror::Error;

/// Result type for shape algebra operations.
pub type AlgebraResult<T> = Result<T, AlgebraError>;

/// Errors that can occur while combining shape layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AlgebraError {
    /// Two layers that must be index-aligned have different lengths.
    #[error("layer length mismatch: expected {expected} positions, found {actual}")]
    ShapeMismatch {
        /// Length of the reference layer.
        expected: usize,
        /// Length of the offending layer.
        actual: usize,
    },

    /// A named layer does not exist on the mesh.
    #[error("shape '{name}' not found")]
    ShapeNotFound {
        /// The missing name.
        name: String,
    },

    /// A sub-shape needed to convert a corrective is missing.
    #[error("shape '{shape}' requires missing sub-shape '{sub_shape}'")]
    MissingSubShape {
        /// The corrective being converted.
        shape: String,
        /// The sub-shape that could not be found.
        sub_shape: String,
    },

    /// The mesh rejected a layer update.
    #[error("mesh error: {0}")]
    Mesh(#[from] MeshError),
}
