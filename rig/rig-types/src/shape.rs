//! Shape-key layers and the ordered set a mesh owns.

use nalgebra::{Point3, Vector3};
use rig_names::component_set;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{MeshError, MeshResult};

/// A named, full set of per-vertex positions alternative to the base pose.
///
/// Positions are index-aligned with the owning mesh's base vertices. A layer
/// does not record whether it holds an absolute pose or a relative
/// corrective; callers track that.
///
/// # Example
///
/// ```
/// use rig_types::{Point3, ShapeLayer};
///
/// let base = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
/// let mut smile = ShapeLayer::from_base("Smile", &base);
/// smile.positions[1].y += 0.5;
///
/// assert_eq!(smile.name(), "Smile");
/// assert_eq!(smile.rank(), 1);
/// assert!((smile.delta(&base)[1].y - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeLayer {
    name: String,

    /// Per-vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Activation weight of the layer in the host (slider value).
    pub value: f64,
}

impl ShapeLayer {
    /// Create a layer from explicit positions.
    #[must_use]
    pub fn new(name: impl Into<String>, positions: Vec<Point3<f64>>) -> Self {
        Self {
            name: name.into(),
            positions,
            value: 0.0,
        }
    }

    /// Create a layer that matches the base pose.
    #[must_use]
    pub fn from_base(name: impl Into<String>, base: &[Point3<f64>]) -> Self {
        Self::new(name, base.to_vec())
    }

    /// The layer name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the layer has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Rank of the layer name.
    #[must_use]
    pub fn rank(&self) -> usize {
        rig_names::rank(&self.name)
    }

    /// Whether the name denotes a corrective.
    #[must_use]
    pub fn is_corrective(&self) -> bool {
        rig_names::is_corrective_name(&self.name)
    }

    /// Per-vertex displacement against a base pose.
    ///
    /// Extra positions on either side are ignored.
    #[must_use]
    pub fn delta(&self, base: &[Point3<f64>]) -> Vec<Vector3<f64>> {
        self.positions
            .iter()
            .zip(base)
            .map(|(p, b)| p - b)
            .collect()
    }
}

/// Ordered shape layers with case-insensitively unique names.
///
/// # Example
///
/// ```
/// use rig_types::{ShapeLayer, ShapeSet};
///
/// let mut shapes = ShapeSet::new();
/// shapes.insert(ShapeLayer::new("JawOpen", Vec::new())).unwrap();
/// shapes.insert(ShapeLayer::new("Smile_JawOpen", Vec::new())).unwrap();
///
/// assert!(shapes.get("jawopen").is_some());
/// assert!(shapes.insert(ShapeLayer::new("JAWOPEN", Vec::new())).is_err());
///
/// // Component lookup ignores order
/// assert_eq!(shapes.find_by_components("JawOpen_Smile").unwrap().name(), "Smile_JawOpen");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShapeSet {
    layers: Vec<ShapeLayer>,
}

impl ShapeSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the set has no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterate over layers in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ShapeLayer> {
        self.layers.iter()
    }

    /// Iterate mutably over layers in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ShapeLayer> {
        self.layers.iter_mut()
    }

    /// Iterate over layer names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + Clone + '_ {
        self.layers.iter().map(ShapeLayer::name)
    }

    /// Position of a layer, matching the name case-insensitively.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.name.eq_ignore_ascii_case(name))
    }

    /// Look up a layer by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ShapeLayer> {
        self.position(name).map(|i| &self.layers[i])
    }

    /// Look up a layer mutably by name (case-insensitive).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut ShapeLayer> {
        self.position(name).map(move |i| &mut self.layers[i])
    }

    /// Whether a layer with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Find the first layer whose component set equals that of `name`.
    ///
    /// `B_A` finds a layer named `A_B`. An exact name match wins.
    #[must_use]
    pub fn find_by_components(&self, name: &str) -> Option<&ShapeLayer> {
        if let Some(layer) = self.get(name) {
            return Some(layer);
        }
        let wanted = component_set(name);
        self.layers
            .iter()
            .find(|layer| component_set(&layer.name) == wanted)
    }

    /// Append a layer.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::DuplicateShape`] if the name is taken.
    pub fn insert(&mut self, layer: ShapeLayer) -> MeshResult<()> {
        if self.contains(&layer.name) {
            return Err(MeshError::DuplicateShape { name: layer.name });
        }
        self.layers.push(layer);
        Ok(())
    }

    /// Remove a layer by name, returning it.
    pub fn remove(&mut self, name: &str) -> Option<ShapeLayer> {
        self.position(name).map(|i| self.layers.remove(i))
    }

    /// Keep only the layers for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&ShapeLayer) -> bool) {
        self.layers.retain(keep);
    }

    /// Highest rank of any layer, 1 for an empty set.
    #[must_use]
    pub fn max_rank(&self) -> usize {
        self.layers.iter().map(ShapeLayer::rank).max().unwrap_or(1).max(1)
    }

    /// Names of the layers with exactly this rank, in order.
    #[must_use]
    pub fn names_of_rank(&self, rank: usize) -> Vec<String> {
        self.layers
            .iter()
            .filter(|layer| layer.rank() == rank)
            .map(|layer| layer.name.clone())
            .collect()
    }

    /// Set every activation value to zero.
    pub fn reset_values(&mut self) {
        for layer in &mut self.layers {
            layer.value = 0.0;
        }
    }
}

impl<'a> IntoIterator for &'a ShapeSet {
    type Item = &'a ShapeLayer;
    type IntoIter = std::slice::Iter<'a, ShapeLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn layer(name: &str) -> ShapeLayer {
        ShapeLayer::new(name, vec![Point3::origin()])
    }

    fn set(names: &[&str]) -> ShapeSet {
        let mut shapes = ShapeSet::new();
        for name in names {
            shapes.insert(layer(name)).unwrap();
        }
        shapes
    }

    #[test]
    fn layer_delta() {
        let base = [Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 0.0, 0.0)];
        let shape = ShapeLayer::new(
            "Pucker",
            vec![Point3::new(1.0, 2.0, 1.0), Point3::new(2.0, 0.0, -1.0)],
        );
        let delta = shape.delta(&base);
        assert_relative_eq!(delta[0], Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(delta[1], Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn layer_rank() {
        assert_eq!(layer("A").rank(), 1);
        assert!(!layer("A").is_corrective());
        assert_eq!(layer("A_B_C").rank(), 3);
        assert!(layer("A_B_C").is_corrective());
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut shapes = set(&["Smile"]);
        assert!(shapes.contains("SMILE"));
        let err = shapes.insert(layer("smile")).unwrap_err();
        assert_eq!(
            err,
            MeshError::DuplicateShape {
                name: "smile".to_string()
            }
        );
    }

    #[test]
    fn insertion_order_is_kept() {
        let shapes = set(&["C", "A", "B"]);
        assert_eq!(shapes.names().collect::<Vec<_>>(), ["C", "A", "B"]);
    }

    #[test]
    fn find_by_components_matches_sets() {
        let shapes = set(&["A", "B", "C", "C_A", "A_B_C"]);
        assert_eq!(shapes.find_by_components("A_C").unwrap().name(), "C_A");
        assert_eq!(shapes.find_by_components("c_b_a").unwrap().name(), "A_B_C");
        assert_eq!(shapes.find_by_components("a").unwrap().name(), "A");
        assert!(shapes.find_by_components("A_B").is_none());
    }

    #[test]
    fn remove_and_retain() {
        let mut shapes = set(&["A", "B", "SelectorLips"]);
        assert_eq!(shapes.remove("b").unwrap().name(), "B");
        assert!(shapes.remove("B").is_none());
        shapes.retain(|layer| !layer.name().contains("Selector"));
        assert_eq!(shapes.names().collect::<Vec<_>>(), ["A"]);
    }

    #[test]
    fn ranks() {
        let shapes = set(&["A", "B", "A_B", "A_B_C", "C"]);
        assert_eq!(shapes.max_rank(), 3);
        assert_eq!(shapes.names_of_rank(1), ["A", "B", "C"]);
        assert_eq!(shapes.names_of_rank(2), ["A_B"]);
        assert_eq!(ShapeSet::new().max_rank(), 1);
    }

    #[test]
    fn reset_values() {
        let mut shapes = set(&["A", "B"]);
        for layer in shapes.iter_mut() {
            layer.value = 0.7;
        }
        shapes.reset_values();
        assert!(shapes.iter().all(|layer| layer.value == 0.0));
    }
}
