//! Core mesh types for corrective shape rigging.
//!
//! This crate provides the data model shared by every `rig-*` crate:
//!
//! - [`RigMesh`] - A triangle mesh owning named shape-key layers
//! - [`ShapeLayer`] - One named set of per-vertex positions
//! - [`ShapeSet`] - Ordered, case-insensitively unique layers
//! - [`VertexWeights`] - Sparse per-vertex selection weights
//! - [`Adjacency`] - Edge-connected neighbors for traversal
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Conventions
//!
//! Layers are index-aligned with the base vertices. A layer holds either an
//! absolute pose or a relative corrective; the layer itself does not say
//! which, the shape name and the processing stage do.
//!
//! # Example
//!
//! ```
//! use rig_types::{Point3, RigMesh, VertexWeights};
//!
//! let mut mesh = RigMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2]],
//! );
//! mesh.add_shape("JawOpen").unwrap();
//! mesh.add_shape("Smile").unwrap();
//! mesh.add_shape("JawOpen_Smile").unwrap();
//!
//! assert!(mesh.has_shape_data());
//! assert_eq!(mesh.max_rank(), 2);
//!
//! let selection = VertexWeights::hard([0, 2]);
//! assert!(selection.is_hard_selection());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod adjacency;
mod error;
mod mesh;
mod shape;
mod weights;

pub use adjacency::Adjacency;
pub use error::{MeshError, MeshResult};
pub use mesh::RigMesh;
pub use shape::{ShapeLayer, ShapeSet};
pub use weights::{is_hard_weight, VertexWeights, HARD_WEIGHT};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
