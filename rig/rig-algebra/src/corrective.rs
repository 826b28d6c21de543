//! Conversion of correctives between absolute and relative form.
//!
//! An *absolute* corrective `A_B` stores the final pose when `A` and `B`
//! are both fully active. Its *relative* form stores only what is left after
//! removing the displacement of every sub-shape (`A` and `B` here; for a
//! rank 3 corrective also the rank 2 correctives between its components).
//!
//! ```text
//! relative(A_B) = absolute(A_B) - (delta(A) + delta(B))
//! ```
//!
//! Sub-shapes are found by component set, so `B_A` satisfies a lookup for
//! `A_B`. Conversions of a mesh must run rank by rank: ascending for
//! absolute to relative, descending for the reverse, so every lookup sees
//! sub-shapes that are already in relative form.

use rig_names::{rank, sub_shape_names};
use rig_types::{Point3, RigMesh, Vector3};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::delta::{check_len, layer};
use crate::error::{AlgebraError, AlgebraResult};

/// What to do when a sub-shape of a corrective is missing.
///
/// A missing rank 2+ sub-shape is always an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SubShapePolicy {
    /// A missing rank 1 sub-shape contributes nothing and logs a warning.
    #[default]
    Lenient,
    /// Any missing sub-shape is an error.
    Strict,
}

/// Sum of the displacements of every sub-shape of `name`.
///
/// # Errors
///
/// Returns [`AlgebraError::MissingSubShape`] for a missing sub-shape the
/// policy does not tolerate, or [`AlgebraError::ShapeMismatch`] if a
/// sub-shape has the wrong number of positions.
///
/// # Example
///
/// ```
/// use rig_algebra::{sub_shape_mix, SubShapePolicy};
/// use rig_types::{Point3, RigMesh};
///
/// let mut mesh = RigMesh::new(vec![Point3::origin()], Vec::new());
/// mesh.add_shape("A").unwrap().positions[0].x = 1.0;
/// mesh.add_shape("B").unwrap().positions[0].y = 2.0;
///
/// let mix = sub_shape_mix(&mesh, "A_B", SubShapePolicy::Lenient).unwrap();
/// assert_eq!((mix[0].x, mix[0].y), (1.0, 2.0));
/// ```
pub fn sub_shape_mix(
    mesh: &RigMesh,
    name: &str,
    policy: SubShapePolicy,
) -> AlgebraResult<Vec<Vector3<f64>>> {
    let mut mix = vec![Vector3::zeros(); mesh.vertex_count()];

    for sub_shape in sub_shape_names(name) {
        let Some(found) = mesh.shapes().find_by_components(&sub_shape) else {
            if rank(&sub_shape) >= 2 || policy == SubShapePolicy::Strict {
                return Err(AlgebraError::MissingSubShape {
                    shape: name.to_owned(),
                    sub_shape,
                });
            }
            warn!(shape = name, sub_shape = %sub_shape, "Sub-shape not found, skipping");
            continue;
        };
        accumulate(&mut mix, mesh, &found.positions)?;
    }

    Ok(mix)
}

/// Displacement of `name` plus that of every sub-shape present on the mesh.
///
/// Missing sub-shapes are skipped silently. This is the total offset a
/// corrective applies when all its components are fully active.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`] if `name` is absent, or
/// [`AlgebraError::ShapeMismatch`].
pub fn corrected_delta(mesh: &RigMesh, name: &str) -> AlgebraResult<Vec<Vector3<f64>>> {
    let mut total = vec![Vector3::zeros(); mesh.vertex_count()];
    accumulate(&mut total, mesh, &layer(mesh, name)?.positions)?;

    for sub_shape in sub_shape_names(name) {
        if let Some(found) = mesh.shapes().find_by_components(&sub_shape) {
            accumulate(&mut total, mesh, &found.positions)?;
        }
    }

    Ok(total)
}

fn accumulate(
    sum: &mut [Vector3<f64>],
    mesh: &RigMesh,
    positions: &[Point3<f64>],
) -> AlgebraResult<()> {
    check_len(mesh.vertex_count(), positions.len())?;
    for ((total, position), base) in sum.iter_mut().zip(positions).zip(&mesh.vertices) {
        *total += position - base;
    }
    Ok(())
}

/// Write the relative form of layer `absolute` into layer `out`.
///
/// `name` selects the sub-shapes to remove; `out` is created if absent and
/// may be the same layer as `absolute`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`] if `absolute` is absent, or any
/// error of [`sub_shape_mix`].
pub fn absolute_to_relative(
    mesh: &mut RigMesh,
    absolute: &str,
    out: &str,
    name: &str,
    policy: SubShapePolicy,
) -> AlgebraResult<()> {
    apply_mix(mesh, absolute, out, name, policy, -1.0)
}

/// Write the absolute form of layer `relative` into layer `out`.
///
/// The inverse of [`absolute_to_relative`].
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`] if `relative` is absent, or any
/// error of [`sub_shape_mix`].
pub fn relative_to_absolute(
    mesh: &mut RigMesh,
    relative: &str,
    out: &str,
    name: &str,
    policy: SubShapePolicy,
) -> AlgebraResult<()> {
    apply_mix(mesh, relative, out, name, policy, 1.0)
}

/// Convert layer `name` from absolute to relative form in place.
///
/// # Errors
///
/// See [`absolute_to_relative`].
///
/// # Example
///
/// ```
/// use rig_algebra::{convert_to_relative, SubShapePolicy};
/// use rig_types::{Point3, RigMesh};
///
/// let mut mesh = RigMesh::new(vec![Point3::origin()], Vec::new());
/// mesh.add_shape("A").unwrap().positions[0].x = 1.0;
/// mesh.add_shape("B").unwrap().positions[0].y = 1.0;
/// // Combined pose with an extra lift
/// mesh.add_shape("A_B").unwrap().positions[0] = Point3::new(1.0, 1.0, 0.5);
///
/// convert_to_relative(&mut mesh, "A_B", SubShapePolicy::Lenient).unwrap();
/// assert_eq!(mesh.shape("A_B").unwrap().positions[0], Point3::new(0.0, 0.0, 0.5));
/// ```
pub fn convert_to_relative(
    mesh: &mut RigMesh,
    name: &str,
    policy: SubShapePolicy,
) -> AlgebraResult<()> {
    absolute_to_relative(mesh, name, name, name, policy)
}

/// Convert layer `name` from relative to absolute form in place.
///
/// # Errors
///
/// See [`relative_to_absolute`].
pub fn convert_to_absolute(
    mesh: &mut RigMesh,
    name: &str,
    policy: SubShapePolicy,
) -> AlgebraResult<()> {
    relative_to_absolute(mesh, name, name, name, policy)
}

fn apply_mix(
    mesh: &mut RigMesh,
    source: &str,
    out: &str,
    name: &str,
    policy: SubShapePolicy,
    sign: f64,
) -> AlgebraResult<()> {
    let mut positions = layer(mesh, source)?.positions.clone();
    check_len(mesh.vertex_count(), positions.len())?;
    let mix = sub_shape_mix(mesh, name, policy)?;

    for (position, offset) in positions.iter_mut().zip(&mix) {
        *position += offset * sign;
    }

    mesh.set_shape_positions(out, positions)?;
    Ok(())
}
