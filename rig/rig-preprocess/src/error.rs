//! Error types for preprocessing and scripting.

use std::path::PathBuf;

use rig_algebra::AlgebraError;
use rig_names::NameError;
use rig_types::MeshError;
use thiserror::Error;

/// Result type for preprocessing runs.
pub type PreprocessResult<T> = Result<T, PreprocessError>;

/// Result type for script parsing and execution.
pub type ScriptResult<T> = Result<T, ScriptError>;

/// Errors reported by a [`MeshRegistry`](crate::MeshRegistry) host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum HostError {
    /// Source and destination of a duplication are the same mesh.
    #[error("cannot duplicate mesh '{name}' onto itself")]
    SameName {
        /// The mesh name.
        name: String,
    },

    /// The source mesh does not exist.
    #[error("mesh '{name}' not found")]
    NotFound {
        /// The missing name.
        name: String,
    },

    /// The destination exists and overwriting was not allowed.
    #[error("mesh '{name}' already exists")]
    AlreadyExists {
        /// The existing name.
        name: String,
    },
}

/// Errors that abort a preprocessing run.
///
/// Validation errors are raised before anything is written. Errors raised
/// later leave no output mesh behind.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PreprocessError {
    /// The configuration cannot drive a run.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong.
        reason: String,
    },

    /// The input mesh does not exist.
    #[error("mesh '{name}' not found")]
    InputNotFound {
        /// The requested mesh name.
        name: String,
    },

    /// The mesh or one of its shapes is badly named.
    #[error("invalid naming on mesh '{mesh}': {reason}")]
    InvalidNaming {
        /// The mesh being processed.
        mesh: String,
        /// What is wrong.
        reason: String,
    },

    /// The mesh has no relative shape data to process.
    #[error("mesh '{name}' has no relative shape keys")]
    NoShapeData {
        /// The mesh name.
        name: String,
    },

    /// Two correctives reduce to the same component set.
    #[error("correctives '{first}' and '{second}' are redundant")]
    RedundantCorrective {
        /// First shape of the pair.
        first: String,
        /// Second shape of the pair.
        second: String,
    },

    /// A layer does not have one position per base vertex.
    #[error("shape '{shape}' has {actual} positions, mesh has {expected} vertices")]
    MismatchedTopology {
        /// The offending layer.
        shape: String,
        /// Base vertex count.
        expected: usize,
        /// Layer length.
        actual: usize,
    },

    /// A sub-shape needed to convert a corrective is missing.
    #[error("shape '{shape}' requires missing sub-shape '{sub_shape}'")]
    MissingSubShape {
        /// The corrective being converted.
        shape: String,
        /// The missing sub-shape.
        sub_shape: String,
    },

    /// The user script failed; the output mesh was removed.
    #[error("script failed on mesh '{mesh}': {source}")]
    ScriptFailure {
        /// The output mesh the script ran on.
        mesh: String,
        /// The underlying script error.
        #[source]
        source: ScriptError,
    },

    /// The host could not duplicate the input mesh.
    #[error("failed to duplicate '{from}' to '{to}': {source}")]
    DuplicationFailed {
        /// Source mesh.
        from: String,
        /// Destination mesh.
        to: String,
        /// The host error.
        #[source]
        source: HostError,
    },

    /// The mesh has no correctives to convert.
    #[error("mesh '{name}' has no corrective shapes to convert")]
    NothingToConvert {
        /// The mesh name.
        name: String,
    },

    /// Any other conversion failure.
    #[error("conversion of shape '{shape}' failed: {source}")]
    Conversion {
        /// The shape being converted.
        shape: String,
        /// The algebra error.
        #[source]
        source: AlgebraError,
    },
}

impl PreprocessError {
    /// Map a conversion error of `shape` onto the preprocessing taxonomy.
    pub(crate) fn from_algebra(shape: &str, error: AlgebraError) -> Self {
        match error {
            AlgebraError::MissingSubShape { shape, sub_shape } => {
                Self::MissingSubShape { shape, sub_shape }
            }
            AlgebraError::ShapeMismatch { expected, actual } => Self::MismatchedTopology {
                shape: shape.to_owned(),
                expected,
                actual,
            },
            source => Self::Conversion {
                shape: shape.to_owned(),
                source,
            },
        }
    }

    /// Map a name validation error of `mesh`.
    pub(crate) fn from_names(mesh: &str, error: NameError) -> Self {
        match error {
            NameError::AmbiguousCorrectives { first, second } => {
                Self::RedundantCorrective { first, second }
            }
            other => Self::InvalidNaming {
                mesh: mesh.to_owned(),
                reason: other.to_string(),
            },
        }
    }
}

/// Errors raised while loading, parsing or running a shape script.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read script '{}': {source}", .path.display())]
    Io {
        /// Path of the script.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line names no known capability.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// 1-based line number.
        line: usize,
        /// The unrecognised word.
        command: String,
    },

    /// A command has malformed arguments.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What is wrong.
        message: String,
    },

    /// A command failed while running.
    #[error("line {line}: {command} failed: {source}")]
    Command {
        /// 1-based line number.
        line: usize,
        /// Capability name of the command.
        command: &'static str,
        /// The underlying failure.
        #[source]
        source: Box<ScriptError>,
    },

    /// A referenced shape does not exist.
    #[error("shape '{name}' not found")]
    ShapeNotFound {
        /// The missing name.
        name: String,
    },

    /// A script tried to write a layer under a name outside the grammar.
    #[error("invalid shape name '{name}'")]
    InvalidShapeName {
        /// The rejected name.
        name: String,
    },

    /// Shape arithmetic failed.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    /// The mesh rejected a layer update.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A script-defined failure.
    #[error("{0}")]
    Failed(String),
}
