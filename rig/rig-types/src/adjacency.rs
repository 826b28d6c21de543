//! Vertex adjacency for mesh traversal.
//!
//! Provides neighbor lookup along mesh edges.

/// Edge-connected neighbors of every vertex.
///
/// Each undirected edge is stored once per endpoint. Faces that reference
/// vertices outside the mesh are skipped.
///
/// # Example
///
/// ```
/// use rig_types::Adjacency;
///
/// // Two triangles sharing the edge 1-2
/// let adjacency = Adjacency::from_faces(4, &[[0, 1, 2], [1, 3, 2]]);
///
/// assert_eq!(adjacency.edge_count(), 5);
/// assert_eq!(adjacency.neighbors(1).len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    /// For each vertex, the indices of its neighbors.
    neighbors: Vec<Vec<u32>>,
}

impl Adjacency {
    /// Build adjacency from triangle faces.
    #[must_use]
    pub fn from_faces(vertex_count: usize, faces: &[[u32; 3]]) -> Self {
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];

        for &[i0, i1, i2] in faces {
            if [i0, i1, i2].iter().any(|&i| i as usize >= vertex_count) {
                continue;
            }
            Self::add_edge(&mut neighbors, i0, i1);
            Self::add_edge(&mut neighbors, i1, i2);
            Self::add_edge(&mut neighbors, i2, i0);
        }

        Self { neighbors }
    }

    /// Build adjacency from explicit edges.
    ///
    /// Useful for hosts that expose loose edges or non-triangle polygons.
    #[must_use]
    pub fn from_edges(vertex_count: usize, edges: &[[u32; 2]]) -> Self {
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];

        for &[a, b] in edges {
            if a as usize >= vertex_count || b as usize >= vertex_count {
                continue;
            }
            Self::add_edge(&mut neighbors, a, b);
        }

        Self { neighbors }
    }

    /// Record an undirected edge once per endpoint. Loops are ignored.
    fn add_edge(neighbors: &mut [Vec<u32>], v0: u32, v1: u32) {
        if v0 == v1 {
            return;
        }
        if !neighbors[v0 as usize].contains(&v1) {
            neighbors[v0 as usize].push(v1);
        }
        if !neighbors[v1 as usize].contains(&v0) {
            neighbors[v1 as usize].push(v0);
        }
    }

    /// Number of vertices the graph was built for.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Vertices sharing an edge with `vertex`.
    ///
    /// Out-of-range vertices have no neighbors.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: u32) -> &[u32] {
        self.neighbors
            .get(vertex as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Whether the graph has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        // Stored once per endpoint
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }
}
