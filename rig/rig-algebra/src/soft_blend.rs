//! Blend one shape layer into another over a soft selection.

use rig_select::{discard_soft, SoftSelectParams, SoftSelector};
use rig_types::{RigMesh, VertexWeights};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::delta::{add_layer, interpolate_layer, layer};
use crate::error::AlgebraResult;

/// Bounds applied to [`SoftBlendParams::amount`].
pub const AMOUNT_RANGE: (f64, f64) = (-2.0, 2.0);

/// How the source layer is combined into the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BlendMode {
    /// Add the source displacement from the base pose.
    #[default]
    Add,
    /// Move the target towards the source positions.
    Interpolate,
}

/// Parameters for [`soft_blend`].
///
/// # Example
///
/// ```
/// use rig_algebra::{BlendMode, SoftBlendParams};
///
/// let params = SoftBlendParams::new()
///     .with_mode(BlendMode::Interpolate)
///     .with_amount(5.0)
///     .without_soft();
///
/// assert_eq!(params.amount, 2.0);
/// assert!(params.soft.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftBlendParams {
    /// Combination mode.
    pub mode: BlendMode,
    /// Blend amount, within [`AMOUNT_RANGE`].
    pub amount: f64,
    /// Soft-selection settings; `None` blends the hard selection only.
    pub soft: Option<SoftSelectParams>,
}

impl Default for SoftBlendParams {
    fn default() -> Self {
        Self {
            mode: BlendMode::Add,
            amount: 0.5,
            soft: Some(SoftSelectParams::default()),
        }
    }
}

impl SoftBlendParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the combination mode.
    #[must_use]
    pub const fn with_mode(mut self, mode: BlendMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the blend amount, clamped to [`AMOUNT_RANGE`].
    #[must_use]
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount.clamp(AMOUNT_RANGE.0, AMOUNT_RANGE.1);
        self
    }

    /// Set the soft-selection settings.
    #[must_use]
    pub const fn with_soft(mut self, soft: SoftSelectParams) -> Self {
        self.soft = Some(soft);
        self
    }

    /// Blend the hard selection only.
    #[must_use]
    pub const fn without_soft(mut self) -> Self {
        self.soft = None;
        self
    }
}

/// Blend layer `from` into layer `to` over a selection of vertices.
///
/// The hard part of `selection` is optionally spread with a soft
/// selection over the base pose, then the blend is applied through the
/// resulting weights. Returns the weights used. Blending a layer into
/// itself changes nothing and returns empty weights.
///
/// # Errors
///
/// Returns [`AlgebraError::ShapeNotFound`](crate::AlgebraError::ShapeNotFound)
/// if either layer is missing.
///
/// # Example
///
/// ```
/// use rig_algebra::{soft_blend, SoftBlendParams};
/// use rig_types::{Point3, RigMesh, VertexWeights};
///
/// let mut mesh = RigMesh::new(
///     vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)],
///     vec![],
/// );
/// mesh.add_shape("Lift").unwrap().positions[0].z = 1.0;
/// mesh.add_shape("Sculpt").unwrap();
///
/// let params = SoftBlendParams::new().with_amount(1.0);
/// soft_blend(&mut mesh, &VertexWeights::hard([0]), "Lift", "Sculpt", &params).unwrap();
///
/// assert_eq!(mesh.shape("Sculpt").unwrap().positions[0].z, 1.0);
/// ```
pub fn soft_blend(
    mesh: &mut RigMesh,
    selection: &VertexWeights,
    from: &str,
    to: &str,
    params: &SoftBlendParams,
) -> AlgebraResult<VertexWeights> {
    layer(mesh, from)?;
    layer(mesh, to)?;
    if from.eq_ignore_ascii_case(to) {
        debug!(shape = from, "Blend into itself skipped");
        return Ok(VertexWeights::new());
    }

    let seed = discard_soft(selection);
    let weights = match &params.soft {
        Some(soft) => SoftSelector::new(mesh).propagate(&seed, soft),
        None => seed,
    };
    let amount = params.amount.clamp(AMOUNT_RANGE.0, AMOUNT_RANGE.1);

    match params.mode {
        BlendMode::Add => add_layer(mesh, &weights, from, to, amount)?,
        BlendMode::Interpolate => interpolate_layer(mesh, &weights, from, to, amount)?,
    }

    debug!(
        from,
        to,
        mode = ?params.mode,
        amount,
        vertices = weights.len(),
        "Soft blend applied"
    );

    Ok(weights)
}
