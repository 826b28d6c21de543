//! Sparse per-vertex selection weights.

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Weight of a hard-selected vertex.
pub const HARD_WEIGHT: f64 = 1.0;

/// Whether a weight marks a hard selection (exactly [`HARD_WEIGHT`]).
#[inline]
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_hard_weight(weight: f64) -> bool {
    weight == HARD_WEIGHT
}

/// Sparse mapping from vertex index to a selection weight in `[0, 1]`.
///
/// Only vertices with a weight above zero are stored: inserting zero (or a
/// negative or NaN weight) removes the vertex. A vertex is *hard* selected
/// when its weight is exactly `1.0`; anything lower is a *soft* weight.
///
/// # Example
///
/// ```
/// use rig_types::VertexWeights;
///
/// let mut weights = VertexWeights::hard([0, 1, 2]);
/// weights.insert(3, 0.25);
/// weights.insert(1, 0.0);
///
/// assert_eq!(weights.len(), 3);
/// assert!(weights.is_hard(0));
/// assert!(!weights.is_hard(3));
/// assert_eq!(weights.weight(1), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexWeights {
    weights: HashMap<u32, f64>,
}

impl VertexWeights {
    /// Create an empty weight map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty weight map with room for `capacity` vertices.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            weights: HashMap::with_capacity(capacity),
        }
    }

    /// Hard-select the given vertices.
    #[must_use]
    pub fn hard(indices: impl IntoIterator<Item = u32>) -> Self {
        Self {
            weights: indices.into_iter().map(|i| (i, HARD_WEIGHT)).collect(),
        }
    }

    /// Hard-select vertices `0..vertex_count`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: vertex indices are u32, meshes with >4B vertices unsupported
    pub fn all(vertex_count: usize) -> Self {
        Self::hard((0..vertex_count).map(|i| i as u32))
    }

    /// Set the weight of a vertex.
    ///
    /// The weight is clamped to `[0, 1]`; a weight of zero (or NaN) removes
    /// the vertex.
    pub fn insert(&mut self, vertex: u32, weight: f64) {
        if weight > 0.0 {
            self.weights.insert(vertex, weight.min(HARD_WEIGHT));
        } else {
            self.weights.remove(&vertex);
        }
    }

    /// Remove a vertex, returning its weight.
    pub fn remove(&mut self, vertex: u32) -> Option<f64> {
        self.weights.remove(&vertex)
    }

    /// Weight of a vertex, if present.
    #[must_use]
    pub fn get(&self, vertex: u32) -> Option<f64> {
        self.weights.get(&vertex).copied()
    }

    /// Weight of a vertex, zero if absent.
    #[must_use]
    pub fn weight(&self, vertex: u32) -> f64 {
        self.get(vertex).unwrap_or(0.0)
    }

    /// Whether the vertex carries any weight.
    #[must_use]
    pub fn contains(&self, vertex: u32) -> bool {
        self.weights.contains_key(&vertex)
    }

    /// Whether the vertex is hard selected.
    #[must_use]
    pub fn is_hard(&self, vertex: u32) -> bool {
        self.get(vertex).is_some_and(is_hard_weight)
    }

    /// Whether every present weight is hard.
    #[must_use]
    pub fn is_hard_selection(&self) -> bool {
        self.weights.values().all(|&w| is_hard_weight(w))
    }

    /// Number of weighted vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no vertex is weighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Iterate over `(vertex, weight)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.weights.iter().map(|(&v, &w)| (v, w))
    }

    /// Iterate over weighted vertex indices in arbitrary order.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.weights.keys().copied()
    }

    /// Iterate over hard-selected vertex indices in arbitrary order.
    pub fn hard_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.iter()
            .filter(|&(_, w)| is_hard_weight(w))
            .map(|(v, _)| v)
    }

    /// `(vertex, weight)` pairs sorted by vertex index.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<(u32, f64)> {
        let mut pairs: Vec<(u32, f64)> = self.iter().collect();
        pairs.sort_unstable_by_key(|&(v, _)| v);
        pairs
    }

    /// Keep only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(u32, f64) -> bool) {
        self.weights.retain(|&v, &mut w| keep(v, w));
    }

    /// Sum of all weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}

impl FromIterator<(u32, f64)> for VertexWeights {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        let mut weights = Self::new();
        weights.extend(iter);
        weights
    }
}

impl Extend<(u32, f64)> for VertexWeights {
    fn extend<I: IntoIterator<Item = (u32, f64)>>(&mut self, iter: I) {
        for (vertex, weight) in iter {
            self.insert(vertex, weight);
        }
    }
}
