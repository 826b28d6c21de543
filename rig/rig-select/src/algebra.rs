//! Set operations on vertex selections.
//!
//! Every function here is pure: inputs are borrowed and a fresh
//! [`VertexWeights`] is returned. Most operations only look at *hard*
//! weights (exactly `1.0`) and drop soft ones.

use std::fmt;
use std::str::FromStr;

use rig_types::{Adjacency, Point3, VertexWeights, HARD_WEIGHT};

use crate::error::SelectError;

/// Hard-select the given vertices.
///
/// # Example
///
/// ```
/// use rig_select::select;
///
/// let selection = select([3, 5]);
/// assert!(selection.is_hard(3) && selection.is_hard(5));
/// ```
#[must_use]
pub fn select(indices: impl IntoIterator<Item = u32>) -> VertexWeights {
    VertexWeights::hard(indices)
}

/// Hard-select every vertex of a mesh with `vertex_count` vertices.
#[must_use]
pub fn select_all(vertex_count: usize) -> VertexWeights {
    VertexWeights::all(vertex_count)
}

/// Vertices hard-selected in both `a` and `b`.
#[must_use]
pub fn intersect(a: &VertexWeights, b: &VertexWeights) -> VertexWeights {
    VertexWeights::hard(a.hard_indices().filter(|&v| b.is_hard(v)))
}

/// Vertices hard-selected in `a` or in `b`.
///
/// Soft weights from either side are dropped.
///
/// # Example
///
/// ```
/// use rig_select::union;
/// use rig_types::VertexWeights;
///
/// let a: VertexWeights = [(0, 1.0), (1, 0.5)].into_iter().collect();
/// let b = VertexWeights::hard([2]);
///
/// let u = union(&a, &b);
/// assert_eq!(u.len(), 2);
/// assert!(!u.contains(1));
/// ```
#[must_use]
pub fn union(a: &VertexWeights, b: &VertexWeights) -> VertexWeights {
    VertexWeights::hard(a.hard_indices().chain(b.hard_indices()))
}

/// Entries of `a` whose vertex is absent from `b`, weights unchanged.
#[must_use]
pub fn subtract(a: &VertexWeights, b: &VertexWeights) -> VertexWeights {
    a.iter().filter(|&(v, _)| !b.contains(v)).collect()
}

/// Only the hard-selected entries of `a`.
#[must_use]
pub fn discard_soft(a: &VertexWeights) -> VertexWeights {
    VertexWeights::hard(a.hard_indices())
}

/// Hard-selected vertices plus their direct neighbors.
///
/// # Example
///
/// ```
/// use rig_select::{grow, select};
/// use rig_types::Adjacency;
///
/// // A strip 0 - 1 - 2 - 3
/// let adjacency = Adjacency::from_edges(4, &[[0, 1], [1, 2], [2, 3]]);
///
/// let grown = grow(&adjacency, &select([0]));
/// assert_eq!(grown.len(), 2);
/// assert!(grown.is_hard(1));
/// ```
#[must_use]
pub fn grow(adjacency: &Adjacency, a: &VertexWeights) -> VertexWeights {
    let mut grown = VertexWeights::with_capacity(a.len() * 2);
    for vertex in a.hard_indices() {
        grown.insert(vertex, HARD_WEIGHT);
        for &neighbor in adjacency.neighbors(vertex) {
            grown.insert(neighbor, HARD_WEIGHT);
        }
    }
    grown
}

/// Hard-selected vertices whose neighbors are all hard-selected too.
///
/// Vertices without any edge are kept.
///
/// # Example
///
/// ```
/// use rig_select::{select, shrink};
/// use rig_types::Adjacency;
///
/// let adjacency = Adjacency::from_edges(4, &[[0, 1], [1, 2], [2, 3]]);
///
/// let shrunk = shrink(&adjacency, &select([0, 1, 2]));
/// assert_eq!(shrunk.to_sorted_vec(), [(0, 1.0), (1, 1.0)]);
/// ```
#[must_use]
pub fn shrink(adjacency: &Adjacency, a: &VertexWeights) -> VertexWeights {
    let hard = discard_soft(a);
    VertexWeights::hard(hard.indices().filter(|&vertex| {
        adjacency
            .neighbors(vertex)
            .iter()
            .all(|&neighbor| hard.contains(neighbor))
    }))
}

/// Side of the X = 0 symmetry plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Vertices with `x >= 0`.
    Left,
    /// Vertices with `x <= 0`.
    Right,
}

impl Side {
    /// Whether a position lies on this side. Center-line vertices lie on both.
    #[must_use]
    pub fn contains(self, position: &Point3<f64>) -> bool {
        match self {
            Self::Left => position.x >= 0.0,
            Self::Right => position.x <= 0.0,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "left",
            Self::Right => "right",
        })
    }
}

impl FromStr for Side {
    type Err = SelectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(Self::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(Self::Right)
        } else {
            Err(SelectError::UnknownSide { name: s.to_owned() })
        }
    }
}

/// Entries of `a` lying on one side of the symmetry plane, weights unchanged.
///
/// Vertices without a position are dropped.
#[must_use]
pub fn select_half(positions: &[Point3<f64>], a: &VertexWeights, side: Side) -> VertexWeights {
    a.iter()
        .filter(|&(v, _)| {
            positions
                .get(v as usize)
                .is_some_and(|position| side.contains(position))
        })
        .collect()
}

/// Hard-select the vertices a layer moves by more than `tolerance`.
///
/// # Example
///
/// ```
/// use rig_select::select_moved;
/// use rig_types::Point3;
///
/// let base = [Point3::origin(), Point3::origin()];
/// let layer = [Point3::origin(), Point3::new(0.0, 0.1, 0.0)];
///
/// let moved = select_moved(&base, &layer, 1e-6);
/// assert_eq!(moved.to_sorted_vec(), [(1, 1.0)]);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: vertex indices are u32, meshes with >4B vertices unsupported
pub fn select_moved(base: &[Point3<f64>], layer: &[Point3<f64>], tolerance: f64) -> VertexWeights {
    VertexWeights::hard(
        base.iter()
            .zip(layer)
            .enumerate()
            .filter(|(_, (b, p))| (*p - *b).norm() > tolerance)
            .map(|(i, _)| i as u32),
    )
}
