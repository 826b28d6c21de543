//! Corrective blend-shape toolkit.
//!
//! This umbrella crate re-exports the rig-* crates behind one API for
//! authoring and exporting combination (corrective) shapes.
//!
//! # Quick Start
//!
//! ```
//! use rig::prelude::*;
//!
//! // A sculpted mesh with absolute correctives
//! let mut mesh = RigMesh::new(vec![Point3::origin()], Vec::new());
//! mesh.add_shape("JawOpen").unwrap().positions[0].y = -1.0;
//! mesh.add_shape("Smile").unwrap().positions[0].x = 0.5;
//! mesh.add_shape("JawOpen_Smile").unwrap().positions[0] = Point3::new(0.5, -1.0, 0.2);
//!
//! let mut scene = Scene::new();
//! scene.insert("head_abs", mesh);
//!
//! // Export relative correctives
//! let report = Preprocessor::default().run(&mut scene, "head_abs", None).unwrap();
//! assert_eq!(report.output, "head_rel");
//!
//! let corrective = scene.get("head_rel").unwrap().shape("JawOpen_Smile").unwrap();
//! assert!((corrective.positions[0].z - 0.2).abs() < 1e-12);
//! assert!(corrective.positions[0].x.abs() < 1e-12);
//! ```
//!
//! # Module Organization
//!
//! - [`names`] - Shape name grammar, ranks, sub-shape enumeration, validation
//! - [`types`] - `RigMesh`, shape layers, vertex weights, adjacency
//! - [`select`] - Selection algebra and soft selection propagation
//! - [`algebra`] - Delta arithmetic and corrective conversion
//! - [`preprocess`] - Batch conversion, mesh registry and shape scripting
//!
//! # Feature Flags
//!
//! - `serde` - Serialize/deserialize configs, parameters and meshes

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Shape name grammar, ranks and sub-shape enumeration.
pub use rig_names as names;

/// Core data structures: `RigMesh`, `ShapeLayer`, `VertexWeights`.
pub use rig_types as types;

/// Selection algebra and soft selection.
pub use rig_select as select;

/// Delta arithmetic and corrective conversion.
pub use rig_algebra as algebra;

/// Batch preprocessing and shape scripting.
pub use rig_preprocess as preprocess;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for corrective shape work.
///
/// # Usage
///
/// ```
/// use rig::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use rig_types::{Point3, RigMesh, ShapeLayer, Vector3, VertexWeights};

    // Names
    pub use rig_names::{rank, sub_shape_names, ShapeName};

    // Selection
    pub use rig_select::{Falloff, Side, SoftSelectParams, SoftSelector};

    // Algebra
    pub use rig_algebra::{convert_to_absolute, convert_to_relative, SubShapePolicy};

    // Preprocessing (main use case)
    pub use rig_preprocess::{
        CommandScript, MeshRegistry, PreprocessConfig, PreprocessError, Preprocessor, Scene,
        ScriptContext, ShapeScript,
    };
}

// =============================================================================
// Tests
// =============================================================================
