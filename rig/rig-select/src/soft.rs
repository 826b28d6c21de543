//! Soft-selection propagation along mesh edges.
//!
//! A hard seed selection spreads outwards one edge ring per round. Each
//! vertex carries the accumulated edge vector back to its closest seed
//! and gets the falloff weight of that vector's length.

use rand::prelude::*;
use rig_types::{is_hard_weight, Adjacency, Point3, RigMesh, Vector3, VertexWeights, HARD_WEIGHT};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::falloff::Falloff;

/// Scale from the user-facing falloff distance to the cutoff distance.
pub const DISTANCE_MULTIPLIER: f64 = 2.0;

/// Parameters for soft-selection propagation.
///
/// # Example
///
/// ```
/// use rig_select::{Falloff, SoftSelectParams};
///
/// let params = SoftSelectParams::new()
///     .with_max_distance(0.5)
///     .with_falloff(Falloff::Dome)
///     .with_seed(42);
///
/// assert_eq!(params.cutoff(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftSelectParams {
    /// Falloff distance. The sign is ignored.
    pub max_distance: f64,
    /// Weight curve.
    pub falloff: Falloff,
    /// Optional seed making [`Falloff::Random`] reproducible.
    pub seed: Option<u64>,
}

impl Default for SoftSelectParams {
    fn default() -> Self {
        Self {
            max_distance: 1.0,
            falloff: Falloff::Bell,
            seed: None,
        }
    }
}

impl SoftSelectParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the falloff distance.
    #[must_use]
    pub const fn with_max_distance(mut self, max_distance: f64) -> Self {
        self.max_distance = max_distance;
        self
    }

    /// Set the falloff curve.
    #[must_use]
    pub const fn with_falloff(mut self, falloff: Falloff) -> Self {
        self.falloff = falloff;
        self
    }

    /// Set a random seed for reproducibility.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Distance at which the weight reaches zero.
    #[must_use]
    pub fn cutoff(&self) -> f64 {
        self.max_distance.abs() * DISTANCE_MULTIPLIER
    }
}

/// Soft-selection solver bound to one mesh's positions and topology.
///
/// Construction builds the adjacency once; [`SoftSelector::propagate`] can
/// then be called for any number of seeds.
///
/// # Example
///
/// ```
/// use rig_select::{select, SoftSelectParams, SoftSelector};
/// use rig_types::{Point3, RigMesh};
///
/// let mesh = RigMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(0.5, 0.0, 0.0),
///         Point3::new(5.0, 0.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// let selector = SoftSelector::new(&mesh);
/// let weights = selector.propagate(&select([0]), &SoftSelectParams::default());
///
/// assert_eq!(weights.weight(0), 1.0);
/// assert!(weights.weight(1) > 0.0 && weights.weight(1) < 1.0);
/// assert!(!weights.contains(2));
/// ```
#[derive(Debug, Clone)]
pub struct SoftSelector<'a> {
    positions: &'a [Point3<f64>],
    adjacency: Adjacency,
}

impl<'a> SoftSelector<'a> {
    /// Create a solver for the base pose of a mesh.
    #[must_use]
    pub fn new(mesh: &'a RigMesh) -> Self {
        Self {
            positions: &mesh.vertices,
            adjacency: mesh.adjacency(),
        }
    }

    /// Create a solver from positions and a pre-built adjacency.
    ///
    /// Useful for propagating over a deformed pose with the base topology.
    #[must_use]
    pub const fn from_parts(positions: &'a [Point3<f64>], adjacency: Adjacency) -> Self {
        Self {
            positions,
            adjacency,
        }
    }

    /// The adjacency used for traversal.
    #[must_use]
    pub const fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Propagate a seed selection.
    ///
    /// Soft weights in `seed` are ignored. Uses a seeded RNG when
    /// `params.seed` is set.
    #[must_use]
    pub fn propagate(&self, seed: &VertexWeights, params: &SoftSelectParams) -> VertexWeights {
        let mut rng: Box<dyn RngCore> = if let Some(seed) = params.seed {
            Box::new(rand::rngs::StdRng::seed_from_u64(seed))
        } else {
            Box::new(rand::thread_rng())
        };
        self.propagate_with_rng(seed, params, &mut rng)
    }

    /// Propagate a seed selection drawing random weights from `rng`.
    #[must_use]
    pub fn propagate_with_rng<R: Rng + ?Sized>(
        &self,
        seed: &VertexWeights,
        params: &SoftSelectParams,
        rng: &mut R,
    ) -> VertexWeights {
        let vertex_count = self.positions.len();
        let cutoff = params.cutoff();

        let mut weights = vec![0.0_f64; vertex_count];
        let mut offsets = vec![Vector3::zeros(); vertex_count];

        let mut frontier: Vec<u32> = seed
            .hard_indices()
            .filter(|&v| (v as usize) < vertex_count)
            .collect();
        frontier.sort_unstable();
        for &vertex in &frontier {
            weights[vertex as usize] = HARD_WEIGHT;
        }
        let seeds = frontier.len();

        let mut rounds = 0_usize;
        while !frontier.is_empty() {
            rounds += 1;
            let mut next = Vec::new();

            for &vertex in &frontier {
                let vi = vertex as usize;
                if is_hard_weight(weights[vi]) {
                    offsets[vi] = Vector3::zeros();
                }
                let origin = offsets[vi];

                for &neighbor in self.adjacency.neighbors(vertex) {
                    let ni = neighbor as usize;
                    if ni >= vertex_count {
                        continue;
                    }
                    let offset = origin + (self.positions[ni] - self.positions[vi]);
                    let candidate = params.falloff.weight(offset.norm(), cutoff, rng);
                    if weights[ni] < candidate {
                        if weights[ni] <= 0.0 {
                            next.push(neighbor);
                        }
                        weights[ni] = candidate;
                        offsets[ni] = offset;
                    }
                }
            }

            frontier = next;
        }

        let result: VertexWeights = weights
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(i, &w)| (index_u32(i), w))
            .collect();

        debug!(
            seeds,
            selected = result.len(),
            rounds,
            falloff = %params.falloff,
            "Soft selection propagated"
        );

        result
    }
}

#[allow(clippy::cast_possible_truncation)]
// Truncation: vertex indices are u32, meshes with >4B vertices unsupported
const fn index_u32(i: usize) -> u32 {
    i as u32
}

/// Propagate a seed over a mesh's base pose in one call.
#[must_use]
pub fn soft_select(mesh: &RigMesh, seed: &VertexWeights, params: &SoftSelectParams) -> VertexWeights {
    SoftSelector::new(mesh).propagate(seed, params)
}
