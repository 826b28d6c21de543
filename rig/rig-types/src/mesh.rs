//! Triangle mesh with shape-key layers.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::adjacency::Adjacency;
use crate::error::{MeshError, MeshResult};
use crate::shape::{ShapeLayer, ShapeSet};

/// A triangle mesh carrying named shape-key layers.
///
/// All layers share the mesh topology: every layer has exactly one position
/// per base vertex. The mesh owns its layers.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Point3<f64>>` - Base (rest) positions
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
/// - shapes: [`ShapeSet`] - Ordered layers, reachable through accessors
///
/// # Example
///
/// ```
/// use rig_types::{Point3, RigMesh};
///
/// let mut mesh = RigMesh::new(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// let smile = mesh.add_shape("Smile").unwrap();
/// smile.positions[0].z = 0.2;
///
/// assert_eq!(mesh.shapes().len(), 1);
/// assert_eq!(mesh.vertex_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigMesh {
    /// Base vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,

    shapes: ShapeSet,

    /// Whether the layers use the relative-base convention.
    pub relative: bool,
}

impl Default for RigMesh {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl RigMesh {
    /// Create a mesh without shape layers, using the relative convention.
    #[must_use]
    pub fn new(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            faces,
            shapes: ShapeSet::new(),
            relative: true,
        }
    }

    /// Builder-style setter for the relative convention flag.
    #[must_use]
    pub fn with_relative(mut self, relative: bool) -> Self {
        self.relative = relative;
        self
    }

    /// Number of base vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Check that every face references existing vertices.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidFace`] for the first bad face.
    pub fn validate_faces(&self) -> MeshResult<()> {
        let vertex_count = self.vertex_count();
        for (face, indices) in self.faces.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::InvalidFace {
                    face,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Build the edge adjacency of the base topology.
    #[must_use]
    pub fn adjacency(&self) -> Adjacency {
        Adjacency::from_faces(self.vertex_count(), &self.faces)
    }

    /// The shape layers.
    #[must_use]
    pub fn shapes(&self) -> &ShapeSet {
        &self.shapes
    }

    /// Mutable access to the shape layers.
    ///
    /// Positions may be edited freely; new layers should go through
    /// [`RigMesh::insert_shape`] so their length is checked.
    pub fn shapes_mut(&mut self) -> &mut ShapeSet {
        &mut self.shapes
    }

    /// Look up a layer by name (case-insensitive).
    #[must_use]
    pub fn shape(&self, name: &str) -> Option<&ShapeLayer> {
        self.shapes.get(name)
    }

    /// Look up a layer mutably by name (case-insensitive).
    pub fn shape_mut(&mut self, name: &str) -> Option<&mut ShapeLayer> {
        self.shapes.get_mut(name)
    }

    /// Look up a layer, failing if absent.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::ShapeNotFound`].
    pub fn require_shape(&self, name: &str) -> MeshResult<&ShapeLayer> {
        self.shapes.get(name).ok_or_else(|| MeshError::ShapeNotFound {
            name: name.to_owned(),
        })
    }

    /// Add a new layer initialised to the base pose.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DuplicateShape`] if the name is taken.
    pub fn add_shape(&mut self, name: impl Into<String>) -> MeshResult<&mut ShapeLayer> {
        let name = name.into();
        self.shapes
            .insert(ShapeLayer::from_base(name.as_str(), &self.vertices))?;
        self.shapes
            .get_mut(&name)
            .ok_or(MeshError::ShapeNotFound { name })
    }

    /// Add an existing layer.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::VertexCountMismatch`] if the layer does not have
    /// one position per vertex, or [`MeshError::DuplicateShape`].
    pub fn insert_shape(&mut self, layer: ShapeLayer) -> MeshResult<()> {
        self.check_layer_len(layer.name(), layer.len())?;
        self.shapes.insert(layer)
    }

    /// Write positions into a layer, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::VertexCountMismatch`] if `positions` does not
    /// have one entry per vertex.
    pub fn set_shape_positions(
        &mut self,
        name: &str,
        positions: Vec<Point3<f64>>,
    ) -> MeshResult<()> {
        self.check_layer_len(name, positions.len())?;
        match self.shapes.get_mut(name) {
            Some(layer) => layer.positions = positions,
            None => self.shapes.insert(ShapeLayer::new(name, positions))?,
        }
        Ok(())
    }

    /// Remove a layer by name.
    pub fn remove_shape(&mut self, name: &str) -> Option<ShapeLayer> {
        self.shapes.remove(name)
    }

    /// Whether the mesh carries relative shape data to work on.
    ///
    /// Requires the relative convention and at least two layers.
    #[must_use]
    pub fn has_shape_data(&self) -> bool {
        self.relative && self.shapes.len() >= 2
    }

    /// Highest rank among the layers.
    #[must_use]
    pub fn max_rank(&self) -> usize {
        self.shapes.max_rank()
    }

    /// Set every layer's activation value to zero.
    pub fn reset_shape_values(&mut self) {
        self.shapes.reset_values();
    }

    fn check_layer_len(&self, name: &str, actual: usize) -> MeshResult<()> {
        if actual == self.vertex_count() {
            Ok(())
        } else {
            Err(MeshError::VertexCountMismatch {
                name: name.to_owned(),
                expected: self.vertex_count(),
                actual,
            })
        }
    }
}
