//! The host-side mesh registry.
//!
//! The preprocessor never owns meshes. It finds, duplicates and deletes
//! them through a [`MeshRegistry`] supplied by the host application.

use hashbrown::HashMap;
use rig_types::RigMesh;

use crate::error::HostError;

/// Named mesh storage provided by the host.
pub trait MeshRegistry {
    /// Look up a mesh by name.
    fn get(&self, name: &str) -> Option<&RigMesh>;

    /// Look up a mesh mutably by name.
    fn get_mut(&mut self, name: &str) -> Option<&mut RigMesh>;

    /// Whether a mesh with this name exists.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Deep-copy mesh `from` (layers included) under the name `to`.
    ///
    /// # Errors
    ///
    /// Fails if `from` is missing, equals `to`, or if `to` exists and
    /// `overwrite` is false.
    fn duplicate(&mut self, from: &str, to: &str, overwrite: bool) -> Result<(), HostError>;

    /// Remove a mesh, returning it if it existed.
    fn delete(&mut self, name: &str) -> Option<RigMesh>;

    /// Names of all meshes.
    fn names(&self) -> Vec<String>;
}

/// In-memory [`MeshRegistry`].
///
/// # Example
///
/// ```
/// use rig_preprocess::{MeshRegistry, Scene};
/// use rig_types::RigMesh;
///
/// let mut scene = Scene::new();
/// scene.insert("head_abs", RigMesh::default());
///
/// scene.duplicate("head_abs", "head_rel", false).unwrap();
/// assert_eq!(scene.names(), ["head_abs", "head_rel"]);
///
/// assert!(scene.duplicate("head_abs", "head_rel", false).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Scene {
    meshes: HashMap<String, RigMesh>,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mesh, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, mesh: RigMesh) -> Option<RigMesh> {
        self.meshes.insert(name.into(), mesh)
    }

    /// Number of meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the scene holds no mesh.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl MeshRegistry for Scene {
    fn get(&self, name: &str) -> Option<&RigMesh> {
        self.meshes.get(name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut RigMesh> {
        self.meshes.get_mut(name)
    }

    fn duplicate(&mut self, from: &str, to: &str, overwrite: bool) -> Result<(), HostError> {
        if from == to {
            return Err(HostError::SameName {
                name: from.to_owned(),
            });
        }
        if !overwrite && self.meshes.contains_key(to) {
            return Err(HostError::AlreadyExists { name: to.to_owned() });
        }
        let copy = self
            .meshes
            .get(from)
            .cloned()
            .ok_or_else(|| HostError::NotFound {
                name: from.to_owned(),
            })?;
        self.meshes.insert(to.to_owned(), copy);
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Option<RigMesh> {
        self.meshes.remove(name)
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.meshes.keys().cloned().collect();
        names.sort_unstable();
        names
    }
}
