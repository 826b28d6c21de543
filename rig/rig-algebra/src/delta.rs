//! Weighted arithmetic on index-aligned position layers.
//!
//! The slice functions work on raw position buffers so callers can mix
//! layers, working states and base poses freely. The `*_layer` functions
//! resolve layers on a [`RigMesh`] by name.

use rig_types::{Point3, RigMesh, ShapeLayer, Vector3, VertexWeights};

use crate::error::{AlgebraError, AlgebraResult};

/// Per-vertex displacement `layer[i] - base[i]`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeMismatch`] if the lengths differ.
///
/// # Example
///
/// ```
/// use rig_algebra::delta_coordinates;
/// use rig_types::{Point3, Vector3};
///
/// let base = [Point3::new(0.0, 0.0, 0.0)];
/// let layer = [Point3::new(0.0, 2.0, 0.0)];
///
/// let delta = delta_coordinates(&base, &layer).unwrap();
/// assert_eq!(delta, [Vector3::new(0.0, 2.0, 0.0)]);
/// ```
pub fn delta_coordinates(
    base: &[Point3<f64>],
    layer: &[Point3<f64>],
) -> AlgebraResult<Vec<Vector3<f64>>> {
    check_len(base.len(), layer.len())?;
    Ok(layer.iter().zip(base).map(|(p, b)| p - b).collect())
}

/// Add the weighted displacement of `source` into `target`.
///
/// For every weighted vertex `i`:
/// `target[i] += w_i * amount * (source[i] - base[i])`.
/// Vertices outside the layers are ignored.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeMismatch`] if the layers differ in length.
pub fn add(
    base: &[Point3<f64>],
    weights: &VertexWeights,
    source: &[Point3<f64>],
    target: &mut [Point3<f64>],
    amount: f64,
) -> AlgebraResult<()> {
    check_len(target.len(), base.len())?;
    check_len(target.len(), source.len())?;

    for (vertex, weight) in weights.iter() {
        let i = vertex as usize;
        if i < target.len() {
            target[i] += (source[i] - base[i]) * (weight * amount);
        }
    }
    Ok(())
}

/// Move `target` towards `source` by the weighted amount.
///
/// For every weighted vertex `i`:
/// `target[i] += (source[i] - target[i]) * amount * w_i`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeMismatch`] if the layers differ in length.
///
/// # Example
///
/// ```
/// use rig_algebra::interpolate;
/// use rig_types::{Point3, VertexWeights};
///
/// let source = [Point3::new(2.0, 0.0, 0.0)];
/// let mut target = [Point3::new(0.0, 0.0, 0.0)];
///
/// interpolate(&VertexWeights::hard([0]), &source, &mut target, 0.5).unwrap();
/// assert_eq!(target[0].x, 1.0);
/// ```
pub fn interpolate(
    weights: &VertexWeights,
    source: &[Point3<f64>],
    target: &mut [Point3<f64>],
    amount: f64,
) -> AlgebraResult<()> {
    check_len(target.len(), source.len())?;

    for (vertex, weight) in weights.iter() {
        let i = vertex as usize;
        if i < target.len() {
            let towards = source[i] - target[i];
            target[i] += towards * (amount * weight);
        }
    }
    Ok(())
}

/// Offset every weighted vertex by `w_i * offset`.
pub fn translate(weights: &VertexWeights, target: &mut [Point3<f64>], offset: &Vector3<f64>) {
    for (vertex, weight) in weights.iter() {
        if let Some(position) = target.get_mut(vertex as usize) {
            *position += offset * weight;
        }
    }
}

/// Overwrite `target` with `source`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeMismatch`] if the lengths differ.
pub fn copy_layer(source: &[Point3<f64>], target: &mut [Point3<f64>]) -> AlgebraResult<()> {
    check_len(target.len(), source.len())?;
    target.copy_from_slice(source);
    Ok(())
}

pub(crate) fn check_len(expected: usize, actual: usize) -> AlgebraResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(AlgebraError::ShapeMismatch { expected, actual })
    }
}

pub(crate) fn layer<'m>(mesh: &'m RigMesh, name: &str) -> AlgebraResult<&'m ShapeLayer> {
    mesh.shape(name).ok_or_else(|| AlgebraError::ShapeNotFound {
        name: name.to_owned(),
    })
}

pub(crate) fn layer_mut<'m>(mesh: &'m mut RigMesh, name: &str) -> AlgebraResult<&'m mut ShapeLayer> {
    mesh.shape_mut(name).ok_or_else(|| AlgebraError::ShapeNotFound {
        name: name.to_owned(),
    })
}

/// [`add`] the displacement of layer `source` into layer `target`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`] for a missing layer, or
/// [`AlgebraError::ShapeMismatch`].
pub fn add_layer(
    mesh: &mut RigMesh,
    weights: &VertexWeights,
    source: &str,
    target: &str,
    amount: f64,
) -> AlgebraResult<()> {
    let displacement = delta_coordinates(&mesh.vertices, &layer(mesh, source)?.positions)?;
    let target = layer_mut(mesh, target)?;
    check_len(target.len(), displacement.len())?;

    for (vertex, weight) in weights.iter() {
        let i = vertex as usize;
        if i < displacement.len() {
            target.positions[i] += displacement[i] * (weight * amount);
        }
    }
    Ok(())
}

/// [`interpolate`] layer `target` towards layer `source`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`] for a missing layer, or
/// [`AlgebraError::ShapeMismatch`].
pub fn interpolate_layer(
    mesh: &mut RigMesh,
    weights: &VertexWeights,
    source: &str,
    target: &str,
    amount: f64,
) -> AlgebraResult<()> {
    let source = layer(mesh, source)?.positions.clone();
    interpolate(weights, &source, &mut layer_mut(mesh, target)?.positions, amount)
}

/// [`translate`] the weighted vertices of layer `target`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`] for a missing layer.
pub fn translate_layer(
    mesh: &mut RigMesh,
    weights: &VertexWeights,
    target: &str,
    offset: &Vector3<f64>,
) -> AlgebraResult<()> {
    translate(weights, &mut layer_mut(mesh, target)?.positions, offset);
    Ok(())
}

/// [`copy_layer`] from layer `source` into layer `target`.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`] for a missing layer, or
/// [`AlgebraError::ShapeMismatch`].
pub fn copy_shape(mesh: &mut RigMesh, source: &str, target: &str) -> AlgebraResult<()> {
    let source = layer(mesh, source)?.positions.clone();
    copy_layer(&source, &mut layer_mut(mesh, target)?.positions)
}
