//! Shape-key delta arithmetic and corrective conversion.
//!
//! This crate combines index-aligned position layers:
//!
//! - **Deltas**: [`delta_coordinates`] of a layer against the base pose
//! - **Weighted edits**: [`add`], [`interpolate`], [`translate`] and
//!   [`copy_layer`] through a [`VertexWeights`](rig_types::VertexWeights)
//!   selection, plus `*_layer` variants that resolve layers by name
//! - **Corrective conversion**: [`absolute_to_relative`] and
//!   [`relative_to_absolute`] remove or restore the [`sub_shape_mix`] of a
//!   corrective
//! - **Soft blend**: [`soft_blend`] adds one layer into another over a
//!   soft selection
//!
//! No value is clamped except the soft blend amount.
//!
//! # Example
//!
//! ```
//! use rig_algebra::{convert_to_absolute, convert_to_relative, SubShapePolicy};
//! use rig_types::{Point3, RigMesh};
//!
//! let mut mesh = RigMesh::new(vec![Point3::origin()], Vec::new());
//! mesh.add_shape("JawOpen").unwrap().positions[0].y = -1.0;
//! mesh.add_shape("Smile").unwrap().positions[0].x = 0.5;
//! mesh.add_shape("JawOpen_Smile").unwrap().positions[0] = Point3::new(0.25, -1.0, 0.0);
//!
//! convert_to_relative(&mut mesh, "JawOpen_Smile", SubShapePolicy::Lenient).unwrap();
//! let relative = mesh.shape("JawOpen_Smile").unwrap().positions[0];
//! assert!((relative.x + 0.25).abs() < 1e-12);
//!
//! convert_to_absolute(&mut mesh, "JawOpen_Smile", SubShapePolicy::Lenient).unwrap();
//! let absolute = mesh.shape("JawOpen_Smile").unwrap().positions[0];
//! assert!((absolute.x - 0.25).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod corrective;
mod delta;
mod error;
mod soft_blend;

pub use corrective::{
    absolute_to_relative, convert_to_absolute, convert_to_relative, corrected_delta,
    relative_to_absolute, sub_shape_mix, SubShapePolicy,
};
pub use delta::{
    add, add_layer, copy_layer, copy_shape, delta_coordinates, interpolate, interpolate_layer,
    translate, translate_layer,
};
pub use error::{AlgebraError, AlgebraResult};
pub use soft_blend::{soft_blend, BlendMode, SoftBlendParams, AMOUNT_RANGE};
