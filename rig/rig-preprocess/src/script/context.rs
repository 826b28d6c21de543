//! Execution state shared by every script capability.

use rig_algebra::{convert_to_relative, corrected_delta, SubShapePolicy};
use rig_names::is_valid_shape_name;
use rig_select::{grow, select_half, select_moved, shrink, Side, SoftSelectParams, SoftSelector};
use rig_types::{Adjacency, Point3, RigMesh, Vector3, VertexWeights};
use tracing::{debug, info};

use crate::error::{ScriptError, ScriptResult};

/// A mesh being edited by a script, with a selection and a working pose.
///
/// The working state is a full set of positions that scripts build up
/// with [`add`](Self::add), [`interp`](Self::interp) and
/// [`translate`](Self::translate), then store with
/// [`save_delta`](Self::save_delta). Every edit goes through the current
/// selection weights.
///
/// # Example
///
/// ```
/// use rig_preprocess::ScriptContext;
/// use rig_types::{Point3, RigMesh};
///
/// let mut mesh = RigMesh::new(vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)], Vec::new());
/// mesh.add_shape("Lift").unwrap().positions[0].z = 1.0;
///
/// let mut ctx = ScriptContext::new(&mut mesh);
/// ctx.select_all();
/// ctx.add("Lift", 0.5).unwrap();
/// ctx.save_delta("HalfLift").unwrap();
///
/// assert_eq!(mesh.shape("HalfLift").unwrap().positions[0].z, 0.5);
/// ```
#[derive(Debug)]
pub struct ScriptContext<'m> {
    mesh: &'m mut RigMesh,
    adjacency: Adjacency,
    selection: VertexWeights,
    working: Vec<Point3<f64>>,
    selector_tag: String,
    policy: SubShapePolicy,
}

fn shape_positions<'a>(mesh: &'a RigMesh, name: &str) -> ScriptResult<&'a [Point3<f64>]> {
    mesh.shape(name)
        .map(|layer| layer.positions.as_slice())
        .ok_or_else(|| ScriptError::ShapeNotFound {
            name: name.to_owned(),
        })
}

fn check_shape_name(name: &str) -> ScriptResult<()> {
    if is_valid_shape_name(name) {
        Ok(())
    } else {
        Err(ScriptError::InvalidShapeName {
            name: name.to_owned(),
        })
    }
}

/// Default selector helper tag.
pub const DEFAULT_SELECTOR_TAG: &str = "Selector";

impl<'m> ScriptContext<'m> {
    /// Start a script session on a mesh.
    ///
    /// The selection starts empty and the working state at the base pose.
    #[must_use]
    pub fn new(mesh: &'m mut RigMesh) -> Self {
        let adjacency = mesh.adjacency();
        let working = mesh.vertices.clone();
        Self {
            mesh,
            adjacency,
            selection: VertexWeights::new(),
            working,
            selector_tag: DEFAULT_SELECTOR_TAG.to_string(),
            policy: SubShapePolicy::default(),
        }
    }

    /// Set the tag used to name selector helper shapes.
    #[must_use]
    pub fn with_selector_tag(mut self, tag: impl Into<String>) -> Self {
        self.selector_tag = tag.into();
        self
    }

    /// Set the sub-shape policy used by
    /// [`override_corrector`](Self::override_corrector).
    #[must_use]
    pub const fn with_sub_shape_policy(mut self, policy: SubShapePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Read access to the mesh (`GetMesh`).
    #[must_use]
    pub fn mesh(&self) -> &RigMesh {
        &*self.mesh
    }

    /// The current selection.
    #[must_use]
    pub fn selection(&self) -> &VertexWeights {
        &self.selection
    }

    /// The working positions.
    #[must_use]
    pub fn working(&self) -> &[Point3<f64>] {
        &self.working
    }

    /// Reset the working state to the base pose (`ResetState`).
    pub fn reset_state(&mut self) {
        self.working.clone_from(&self.mesh.vertices);
    }

    /// Load a shape into the working state (`SetState`).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ShapeNotFound`].
    pub fn set_state(&mut self, name: &str) -> ScriptResult<()> {
        let positions = shape_positions(self.mesh, name)?.to_vec();
        self.working = positions;
        Ok(())
    }

    /// Add the selected part of a shape's displacement (`Add`).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ShapeNotFound`] or a length mismatch.
    pub fn add(&mut self, name: &str, amount: f64) -> ScriptResult<()> {
        let source = shape_positions(self.mesh, name)?;
        rig_algebra::add(
            &self.mesh.vertices,
            &self.selection,
            source,
            &mut self.working,
            amount,
        )?;
        Ok(())
    }

    /// Add a shape's displacement plus that of every present sub-shape
    /// (`AddCorrected`).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Algebra`] if the shape is missing.
    pub fn add_corrected(&mut self, name: &str, amount: f64) -> ScriptResult<()> {
        let total = corrected_delta(self.mesh, name)?;
        for (vertex, weight) in self.selection.iter() {
            let i = vertex as usize;
            if let (Some(position), Some(offset)) = (self.working.get_mut(i), total.get(i)) {
                *position += offset * (weight * amount);
            }
        }
        Ok(())
    }

    /// Move the working state towards a shape (`Interp`).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ShapeNotFound`] or a length mismatch.
    pub fn interp(&mut self, name: &str, amount: f64) -> ScriptResult<()> {
        let source = shape_positions(self.mesh, name)?;
        rig_algebra::interpolate(&self.selection, source, &mut self.working, amount)?;
        Ok(())
    }

    /// Offset the selected working positions (`Translate`).
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        rig_algebra::translate(&self.selection, &mut self.working, offset);
    }

    /// Write the working state into a shape, creating it if absent
    /// (`SaveDelta`).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::InvalidShapeName`] for a name outside the
    /// shape grammar, or [`ScriptError::Mesh`] if the working state no
    /// longer matches the mesh.
    pub fn save_delta(&mut self, name: &str) -> ScriptResult<()> {
        check_shape_name(name)?;
        self.mesh.set_shape_positions(name, self.working.clone())?;
        debug!(shape = name, "Saved working state");
        Ok(())
    }

    /// Delete a shape (`DeleteDelta`).
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ShapeNotFound`].
    pub fn delete_delta(&mut self, name: &str) -> ScriptResult<()> {
        self.mesh
            .remove_shape(name)
            .map(|_| ())
            .ok_or_else(|| ScriptError::ShapeNotFound {
                name: name.to_owned(),
            })
    }

    /// Save the working state into a corrective and convert it to
    /// relative form (`OverrideCorrector`).
    ///
    /// # Errors
    ///
    /// Returns any error of [`save_delta`](Self::save_delta) or of the
    /// conversion.
    pub fn override_corrector(&mut self, name: &str) -> ScriptResult<()> {
        self.save_delta(name)?;
        convert_to_relative(&mut *self.mesh, name, self.policy)?;
        Ok(())
    }

    /// Replace the selection (`Select`).
    pub fn select(&mut self, selection: VertexWeights) {
        self.selection = selection;
    }

    /// Hard-select the given vertices.
    pub fn select_indices(&mut self, indices: impl IntoIterator<Item = u32>) {
        self.selection = rig_select::select(indices);
    }

    /// Hard-select every vertex.
    pub fn select_all(&mut self) {
        self.selection = rig_select::select_all(self.mesh.vertex_count());
    }

    /// Clear the selection.
    pub fn select_none(&mut self) {
        self.selection = VertexWeights::new();
    }

    /// Hard-select the vertices a shape moves by more than `tolerance`.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::ShapeNotFound`].
    pub fn select_shape(&mut self, name: &str, tolerance: f64) -> ScriptResult<()> {
        let moved = select_moved(&self.mesh.vertices, shape_positions(self.mesh, name)?, tolerance);
        self.selection = moved;
        Ok(())
    }

    /// Keep the part of the selection on one side of the base pose
    /// (`SelectHalf`).
    pub fn select_half(&mut self, side: Side) {
        self.selection = select_half(&self.mesh.vertices, &self.selection, side);
    }

    /// Grow the hard selection by `steps` edge rings (`GrowSelection`).
    ///
    /// Stops early once a ring adds nothing.
    pub fn grow_selection(&mut self, steps: usize) {
        self.repeat_until_stable(steps, grow);
    }

    /// Replace the selection by its soft propagation (`GrowSelection soft`).
    pub fn grow_soft(&mut self, params: &SoftSelectParams) {
        let selector = SoftSelector::from_parts(&self.mesh.vertices, self.adjacency.clone());
        self.selection = selector.propagate(&self.selection, params);
    }

    /// Shrink the hard selection by `steps` edge rings (`ShrinkSelection`).
    ///
    /// Stops early once a ring removes nothing.
    pub fn shrink_selection(&mut self, steps: usize) {
        self.repeat_until_stable(steps, shrink);
    }

    fn repeat_until_stable(
        &mut self,
        steps: usize,
        step: fn(&Adjacency, &VertexWeights) -> VertexWeights,
    ) {
        for done in 0..steps {
            let next = step(&self.adjacency, &self.selection);
            if next == self.selection {
                debug!(steps = done, requested = steps, "Selection stable");
                return;
            }
            self.selection = next;
        }
    }

    /// Log the selection (`PrintSel`).
    pub fn print_selection(&self) {
        let hard = self.selection.hard_indices().count();
        info!(
            vertices = self.selection.len(),
            hard,
            soft = self.selection.len() - hard,
            total_weight = self.selection.total(),
            "Selection"
        );
        for (vertex, weight) in self.selection.to_sorted_vec() {
            debug!(vertex, weight, "Selected vertex");
        }
    }

    /// Write the selection into the selector helper shape `tag + index`,
    /// raising each vertex along Z by its weight (`VisualiseSel`).
    ///
    /// Returns the helper shape name.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::InvalidShapeName`] if the tag does not make
    /// a valid name, or [`ScriptError::Mesh`] if the layer cannot be
    /// written.
    pub fn visualise_selection(&mut self, index: u32) -> ScriptResult<String> {
        let name = format!("{}{index}", self.selector_tag);
        let mut positions = self.mesh.vertices.clone();
        for (vertex, weight) in self.selection.iter() {
            if let Some(position) = positions.get_mut(vertex as usize) {
                position.z += weight;
            }
        }
        check_shape_name(&name)?;
        self.mesh.set_shape_positions(&name, positions)?;
        debug!(shape = %name, vertices = self.selection.len(), "Selection visualised");
        Ok(name)
    }
}
