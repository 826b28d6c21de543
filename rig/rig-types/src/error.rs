//! Error types for mesh and shape-layer operations.

use thiserror::Error;

/// Result type for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors that can occur while editing a mesh's shape layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MeshError {
    /// A layer with this name (compared case-insensitively) already exists.
    #[error("shape '{name}' already exists")]
    DuplicateShape {
        /// The duplicate name.
        name: String,
    },

    /// No layer with this name exists.
    #[error("shape '{name}' not found")]
    ShapeNotFound {
        /// The missing name.
        name: String,
    },

    /// A layer's vertex count differs from the mesh's.
    #[error("shape '{name}' has {actual} vertices (mesh has {expected})")]
    VertexCountMismatch {
        /// The layer name.
        name: String,
        /// Vertex count of the mesh.
        expected: usize,
        /// Vertex count of the layer.
        actual: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    InvalidFace {
        /// The face index.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },
}
