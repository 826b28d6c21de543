//! Batch preprocessing of corrective blend-shape meshes.
//!
//! A mesh named `<name>_abs` carries absolute correctives: each combination
//! shape such as `JawOpen_Smile` is the full sculpt seen when all of its
//! components are active. [`Preprocessor::run`] validates such a mesh,
//! copies it to `<name>_rel` and rewrites every corrective in relative
//! form, rank by rank, so that a runtime summing active layers reproduces
//! the sculpt. [`Preprocessor::rebuild_absolute`] goes the other way.
//!
//! Meshes live in a [`MeshRegistry`]; [`Scene`] is the in-memory one.
//! A run may hand the output mesh to a [`ShapeScript`] instead of doing
//! the default conversion. Scripts see a [`ScriptContext`] exposing the
//! operations of the [`Capability`] table, either from Rust code or from a
//! plain-text [`CommandScript`].
//!
//! Failures after the output mesh is created delete it again, so a run
//! either produces a complete output or nothing.
//!
//! # Example
//!
//! ```
//! use rig_preprocess::{CommandScript, MeshRegistry, Preprocessor, Scene};
//! use rig_types::{Point3, RigMesh};
//!
//! let mut mesh = RigMesh::new(
//!     vec![Point3::new(-1.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
//!     Vec::new(),
//! );
//! mesh.add_shape("Blink").unwrap().positions[1].z = 1.0;
//! mesh.add_shape("Squint").unwrap();
//!
//! let mut scene = Scene::new();
//! scene.insert("face_abs", mesh);
//!
//! let mut script: CommandScript = "
//!     ## Left half of Blink as its own shape
//!     Select all
//!     SelectHalf left
//!     Add Blink 1.0
//!     SaveDelta BlinkL
//! "
//! .parse()
//! .unwrap();
//!
//! Preprocessor::default()
//!     .run(&mut scene, "face_abs", Some(&mut script))
//!     .unwrap();
//!
//! let blink_l = scene.get("face_rel").unwrap().shape("BlinkL").unwrap();
//! assert_eq!(blink_l.positions[1].z, 1.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod config;
mod error;
mod host;
mod preprocess;
mod rebuild;
pub mod script;

pub use config::PreprocessConfig;
pub use error::{
    HostError, PreprocessError, PreprocessResult, ScriptError, ScriptResult,
};
pub use host::{MeshRegistry, Scene};
pub use preprocess::{PreprocessReport, Preprocessor, RankTiming};
pub use script::{
    Capability, CommandScript, ScriptContext, ShapeScript, CAPABILITY_TABLE_VERSION,
    DEFAULT_SELECTOR_TAG,
};
