//! Vertex selection algebra and soft-selection propagation.
//!
//! Selections are [`VertexWeights`](rig_types::VertexWeights): sparse maps
//! from vertex index to a weight in `[0, 1]`. This crate provides:
//!
//! - **Set operations** on hard selections: [`intersect`], [`union`],
//!   [`subtract`], [`discard_soft`]
//! - **Topological growth**: [`grow`] and [`shrink`] by one edge ring
//! - **Spatial filters**: [`select_half`] and [`select_moved`]
//! - **Soft selection**: [`SoftSelector`] spreads a hard seed along mesh
//!   edges with a [`Falloff`] curve
//!
//! # Example
//!
//! ```
//! use rig_select::{grow, select, Falloff, SoftSelectParams, SoftSelector};
//! use rig_types::{Point3, RigMesh};
//!
//! let mesh = RigMesh::new(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!     ],
//!     vec![[0, 1, 2], [0, 2, 3]],
//! );
//!
//! // Hard growth by one ring
//! let ring = grow(&mesh.adjacency(), &select([1]));
//! assert_eq!(ring.len(), 3);
//!
//! // Smooth falloff from the same seed
//! let params = SoftSelectParams::new()
//!     .with_max_distance(1.0)
//!     .with_falloff(Falloff::Linear);
//! let soft = SoftSelector::new(&mesh).propagate(&select([1]), &params);
//! assert_eq!(soft.weight(1), 1.0);
//! assert!((soft.weight(0) - 0.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod algebra;
mod error;
mod falloff;
mod soft;

pub use algebra::{
    discard_soft, grow, intersect, select, select_all, select_half, select_moved, shrink,
    subtract, union, Side,
};
pub use error::{SelectError, SelectResult};
pub use falloff::{Falloff, COINCIDENT_DISTANCE};
pub use soft::{soft_select, SoftSelectParams, SoftSelector, DISTANCE_MULTIPLIER};
