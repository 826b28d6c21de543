//! Batch conversion of an absolute mesh into its relative export mesh.

use std::time::{Duration, Instant};

use rig_algebra::convert_to_relative;
use rig_names::{check_redundancy, validate_names};
use rig_types::RigMesh;
use tracing::{debug, error, info};

use crate::config::PreprocessConfig;
use crate::error::{PreprocessError, PreprocessResult};
use crate::host::MeshRegistry;
use crate::script::{ScriptContext, ShapeScript};

/// Time spent converting the shapes of one rank.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankTiming {
    /// The rank.
    pub rank: usize,
    /// Number of shapes converted.
    pub shapes: usize,
    /// Wall time for the rank.
    pub elapsed: Duration,
}

impl RankTiming {
    /// Average time per shape, zero for an empty rank.
    #[must_use]
    pub fn average(&self) -> Duration {
        u32::try_from(self.shapes)
            .ok()
            .filter(|&n| n > 0)
            .map_or(Duration::ZERO, |n| self.elapsed / n)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PreprocessReport {
    /// Name of the mesh that was written.
    pub output: String,
    /// Highest shape rank on the output mesh.
    pub max_rank: usize,
    /// Converted shapes, in conversion order.
    pub converted: Vec<String>,
    /// Selector helper shapes removed from the output.
    pub removed_selectors: Vec<String>,
    /// Per-rank conversion timing.
    pub timings: Vec<RankTiming>,
}

/// Converts absolute correctives to relative ones on a copy of a mesh.
///
/// # Example
///
/// ```
/// use rig_preprocess::{MeshRegistry, PreprocessConfig, Preprocessor, Scene};
/// use rig_types::{Point3, RigMesh};
///
/// let mut mesh = RigMesh::new(vec![Point3::origin()], Vec::new());
/// mesh.add_shape("A").unwrap().positions[0].x = 1.0;
/// mesh.add_shape("B").unwrap().positions[0].y = 1.0;
/// mesh.add_shape("A_B").unwrap().positions[0] = Point3::new(1.0, 1.0, 0.5);
///
/// let mut scene = Scene::new();
/// scene.insert("head_abs", mesh);
///
/// let report = Preprocessor::new(PreprocessConfig::default())
///     .run(&mut scene, "head_abs", None)
///     .unwrap();
///
/// assert_eq!(report.output, "head_rel");
/// assert_eq!(report.converted, ["A_B"]);
///
/// let corrective = scene.get("head_rel").unwrap().shape("A_B").unwrap();
/// assert_eq!(corrective.positions[0], Point3::new(0.0, 0.0, 0.5));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: PreprocessConfig,
}

impl Preprocessor {
    /// Create a preprocessor.
    #[must_use]
    pub const fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// Preprocess mesh `mesh_name` into its relative output mesh.
    ///
    /// Without a script every corrective is converted to relative form,
    /// rank by rank. With a script, the script alone edits the output.
    /// Either way all activation values end at zero and selector helper
    /// shapes are removed.
    ///
    /// # Errors
    ///
    /// Validation errors ([`InvalidConfig`], [`InputNotFound`], [`InvalidNaming`],
    /// [`NoShapeData`], [`RedundantCorrective`], [`MismatchedTopology`])
    /// are raised before anything is written. Later errors delete the
    /// output mesh before returning.
    ///
    /// [`InvalidConfig`]: PreprocessError::InvalidConfig
    /// [`InputNotFound`]: PreprocessError::InputNotFound
    /// [`InvalidNaming`]: PreprocessError::InvalidNaming
    /// [`NoShapeData`]: PreprocessError::NoShapeData
    /// [`RedundantCorrective`]: PreprocessError::RedundantCorrective
    /// [`MismatchedTopology`]: PreprocessError::MismatchedTopology
    pub fn run<R: MeshRegistry + ?Sized>(
        &self,
        registry: &mut R,
        mesh_name: &str,
        script: Option<&mut dyn ShapeScript>,
    ) -> PreprocessResult<PreprocessReport> {
        info!(mesh = mesh_name, scripted = script.is_some(), "Preprocessing mesh");

        let output = self.validate(registry, mesh_name).map_err(|e| {
            error!(mesh = mesh_name, error = %e, "Validation failed");
            e
        })?;

        duplicate(registry, mesh_name, &output, self.config.overwrite)?;
        debug!(from = mesh_name, to = %output, "Duplicated input mesh");

        let result = registry
            .get_mut(&output)
            .ok_or_else(|| PreprocessError::InputNotFound {
                name: output.clone(),
            })
            .and_then(|mesh| self.process(mesh, &output, script));

        match result {
            Ok(report) => {
                info!(
                    mesh = %report.output,
                    max_rank = report.max_rank,
                    shapes = report.converted.len(),
                    "Preprocessing done"
                );
                Ok(report)
            }
            Err(e) => {
                error!(mesh = %output, error = %e, "Preprocessing failed, removing output");
                registry.delete(&output);
                Err(e)
            }
        }
    }

    fn validate<R: MeshRegistry + ?Sized>(
        &self,
        registry: &R,
        mesh_name: &str,
    ) -> PreprocessResult<String> {
        self.config.validate()?;
        let mesh = registry
            .get(mesh_name)
            .ok_or_else(|| PreprocessError::InputNotFound {
                name: mesh_name.to_owned(),
            })?;

        let output =
            self.config
                .output_name(mesh_name)
                .ok_or_else(|| PreprocessError::InvalidNaming {
                    mesh: mesh_name.to_owned(),
                    reason: format!(
                        "mesh name must end with '{}'",
                        self.config.absolute_suffix
                    ),
                })?;

        if !mesh.has_shape_data() {
            return Err(PreprocessError::NoShapeData {
                name: mesh_name.to_owned(),
            });
        }

        check_names(mesh, mesh_name)?;
        check_topology(mesh)?;

        Ok(output)
    }

    fn process(
        &self,
        mesh: &mut RigMesh,
        output: &str,
        script: Option<&mut dyn ShapeScript>,
    ) -> PreprocessResult<PreprocessReport> {
        mesh.reset_shape_values();
        let mut removed_selectors = strip_selectors(mesh, &self.config);

        let mut report = PreprocessReport {
            output: output.to_owned(),
            ..PreprocessReport::default()
        };

        if let Some(script) = script {
            let mut ctx = ScriptContext::new(mesh)
                .with_selector_tag(self.config.selector_tag.as_str())
                .with_sub_shape_policy(self.config.sub_shape_policy);
            script
                .run(&mut ctx)
                .map_err(|source| PreprocessError::ScriptFailure {
                    mesh: output.to_owned(),
                    source,
                })?;
            removed_selectors.extend(strip_selectors(mesh, &self.config));
        } else {
            for rank in 2..=mesh.max_rank() {
                let start = Instant::now();
                let names = mesh.shapes().names_of_rank(rank);
                for name in &names {
                    convert_to_relative(mesh, name, self.config.sub_shape_policy)
                        .map_err(|e| PreprocessError::from_algebra(name, e))?;
                    debug!(shape = %name, "Converted to relative");
                }
                let timing = RankTiming {
                    rank,
                    shapes: names.len(),
                    elapsed: start.elapsed(),
                };
                debug!(
                    rank,
                    shapes = timing.shapes,
                    elapsed_ms = timing.elapsed.as_secs_f64() * 1000.0,
                    average_ms = timing.average().as_secs_f64() * 1000.0,
                    "Rank converted"
                );
                report.converted.extend(names);
                report.timings.push(timing);
            }
        }

        mesh.reset_shape_values();
        report.max_rank = mesh.max_rank();
        report.removed_selectors = removed_selectors;
        Ok(report)
    }
}

/// Duplicate `from` into `to`, mapping host errors.
pub(crate) fn duplicate<R: MeshRegistry + ?Sized>(
    registry: &mut R,
    from: &str,
    to: &str,
    overwrite: bool,
) -> PreprocessResult<()> {
    registry.duplicate(from, to, overwrite).map_err(|source| {
        error!(from, to, error = %source, "Duplication failed");
        PreprocessError::DuplicationFailed {
            from: from.to_owned(),
            to: to.to_owned(),
            source,
        }
    })
}

/// Layer names must follow the grammar and no two correctives may share
/// a component set.
pub(crate) fn check_names(mesh: &RigMesh, mesh_name: &str) -> PreprocessResult<()> {
    validate_names(mesh.shapes().names())
        .map_err(|e| PreprocessError::from_names(mesh_name, e))?;
    check_redundancy(mesh.shapes().names())
        .map_err(|e| PreprocessError::from_names(mesh_name, e))
}

/// Every layer must have one position per base vertex.
pub(crate) fn check_topology(mesh: &RigMesh) -> PreprocessResult<()> {
    let expected = mesh.vertex_count();
    match mesh.shapes().iter().find(|layer| layer.len() != expected) {
        Some(layer) => Err(PreprocessError::MismatchedTopology {
            shape: layer.name().to_owned(),
            expected,
            actual: layer.len(),
        }),
        None => Ok(()),
    }
}

/// Remove selector helper layers, returning their names.
fn strip_selectors(mesh: &mut RigMesh, config: &PreprocessConfig) -> Vec<String> {
    let selectors: Vec<String> = mesh
        .shapes()
        .names()
        .filter(|name| config.is_selector(name))
        .map(str::to_owned)
        .collect();
    for name in &selectors {
        mesh.remove_shape(name);
        debug!(shape = %name, "Removed selector");
    }
    selectors
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ScriptError;
    use crate::host::Scene;
    use crate::script::ScriptContext;
    use crate::ScriptResult;
    use approx::assert_relative_eq;
    use rig_algebra::SubShapePolicy;
    use rig_types::{Point3, ShapeLayer};

    fn base() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    fn shifted(dx: f64, dy: f64, dz: f64) -> Vec<Point3<f64>> {
        base()
            .into_iter()
            .map(|p| Point3::new(p.x + dx, p.y + dy, p.z + dz))
            .collect()
    }

    /// Mesh with A, B, C and absolute correctives up to rank 3.
    fn head() -> RigMesh {
        let mut mesh = RigMesh::new(base(), vec![[0, 1, 2]]);
        mesh.set_shape_positions("A", shifted(1.0, 0.0, 0.0)).unwrap();
        mesh.set_shape_positions("B", shifted(0.0, 1.0, 0.0)).unwrap();
        mesh.set_shape_positions("C", shifted(0.0, 0.0, 1.0)).unwrap();
        mesh.set_shape_positions("A_B", shifted(1.0, 1.0, 0.5)).unwrap();
        mesh.set_shape_positions("A_C", shifted(1.0, 0.0, 1.0)).unwrap();
        mesh.set_shape_positions("B_C", shifted(0.0, 1.0, 1.0)).unwrap();
        mesh.set_shape_positions("A_B_C", shifted(1.0, 1.0, 2.0)).unwrap();
        for layer in mesh.shapes_mut().iter_mut() {
            layer.value = 1.0;
        }
        mesh
    }

    fn scene_with(name: &str, mesh: RigMesh) -> Scene {
        let mut scene = Scene::new();
        scene.insert(name, mesh);
        scene
    }

    fn delta(mesh: &RigMesh, name: &str, vertex: usize) -> rig_types::Vector3<f64> {
        mesh.shape(name).unwrap().positions[vertex] - mesh.vertices[vertex]
    }

    #[test]
    fn converts_every_rank() {
        let mut scene = scene_with("head_abs", head());
        let report = Preprocessor::default()
            .run(&mut scene, "head_abs", None)
            .unwrap();

        assert_eq!(report.output, "head_rel");
        assert_eq!(report.max_rank, 3);
        assert_eq!(report.converted, ["A_B", "A_C", "B_C", "A_B_C"]);
        assert_eq!(report.timings.len(), 2);
        assert_eq!(report.timings[0].shapes, 3);

        let out = scene.get("head_rel").unwrap();
        assert_relative_eq!(delta(out, "A_B", 0).z, 0.5);
        assert_relative_eq!(delta(out, "A_B", 0).x, 0.0);
        assert_relative_eq!(delta(out, "A_C", 1).norm(), 0.0);
        // 2.0 - (A + B + C) - rel(A_B) = 2 - 1 - 0.5
        assert_relative_eq!(delta(out, "A_B_C", 2).z, 0.5);
        assert!(out.shapes().iter().all(|layer| layer.value == 0.0));

        // Input untouched
        let input = scene.get("head_abs").unwrap();
        assert_relative_eq!(delta(input, "A_B", 0).x, 1.0);
        assert!(input.shapes().iter().all(|layer| layer.value == 1.0));
    }

    #[test]
    fn validation_errors_leave_registry_untouched() {
        let mut scene = scene_with("head", head());
        let err = Preprocessor::default()
            .run(&mut scene, "head", None)
            .unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidNaming { .. }));

        let err = Preprocessor::default()
            .run(&mut scene, "missing_abs", None)
            .unwrap_err();
        assert!(matches!(err, PreprocessError::InputNotFound { .. }));
        assert_eq!(scene.names(), ["head"]);
    }

    #[test]
    fn empty_selector_tag_is_rejected() {
        let mut scene = scene_with("head_abs", head());
        let config = PreprocessConfig::default().with_selector_tag("");
        let err = Preprocessor::new(config)
            .run(&mut scene, "head_abs", None)
            .unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidConfig { .. }));
        assert_eq!(scene.names(), ["head_abs"]);
    }

    #[test]
    fn no_shape_data() {
        let mut mesh = RigMesh::new(base(), vec![[0, 1, 2]]);
        mesh.add_shape("A").unwrap();
        let mut scene = scene_with("m_abs", mesh.clone());
        assert!(matches!(
            Preprocessor::default().run(&mut scene, "m_abs", None),
            Err(PreprocessError::NoShapeData { .. })
        ));

        mesh.add_shape("B").unwrap();
        let mut scene = scene_with("m_abs", mesh.with_relative(false));
        assert!(matches!(
            Preprocessor::default().run(&mut scene, "m_abs", None),
            Err(PreprocessError::NoShapeData { .. })
        ));
    }

    #[test]
    fn invalid_shape_name() {
        let mut mesh = head();
        mesh.add_shape("A__B").unwrap();
        let mut scene = scene_with("head_abs", mesh);
        let err = Preprocessor::default()
            .run(&mut scene, "head_abs", None)
            .unwrap_err();
        assert!(matches!(err, PreprocessError::InvalidNaming { .. }));
        assert!(!scene.contains("head_rel"));
    }

    #[test]
    fn redundant_correctives() {
        let mut mesh = head();
        mesh.add_shape("C_A").unwrap();
        let mut scene = scene_with("head_abs", mesh);
        let err = Preprocessor::default()
            .run(&mut scene, "head_abs", None)
            .unwrap_err();
        match err {
            PreprocessError::RedundantCorrective { first, second } => {
                assert_eq!((first.as_str(), second.as_str()), ("A_C", "C_A"));
            }
            other => panic!("unexpected error {other}"),
        }
        assert!(!scene.contains("head_rel"));
    }

    #[test]
    fn mismatched_topology() {
        let mut mesh = head();
        mesh.shapes_mut()
            .insert(ShapeLayer::new("D", vec![Point3::origin()]))
            .unwrap();
        let mut scene = scene_with("head_abs", mesh);
        let err = Preprocessor::default()
            .run(&mut scene, "head_abs", None)
            .unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::MismatchedTopology { ref shape, expected: 3, actual: 1 } if shape == "D"
        ));
    }

    #[test]
    fn missing_sub_shape_removes_output() {
        let mut mesh = head();
        mesh.remove_shape("B_C");
        let mut scene = scene_with("head_abs", mesh);
        let err = Preprocessor::default()
            .run(&mut scene, "head_abs", None)
            .unwrap_err();
        assert!(matches!(
            err,
            PreprocessError::MissingSubShape { ref sub_shape, .. } if sub_shape == "B_C"
        ));
        assert!(!scene.contains("head_rel"));
        assert!(scene.contains("head_abs"));
    }

    #[test]
    fn strict_policy_rejects_missing_base() {
        let mut mesh = head();
        mesh.remove_shape("C");
        mesh.remove_shape("A_C");
        mesh.remove_shape("B_C");
        mesh.remove_shape("A_B_C");
        mesh.add_shape("A_D").unwrap();

        let mut scene = scene_with("head_abs", mesh.clone());
        assert!(Preprocessor::default()
            .run(&mut scene, "head_abs", None)
            .is_ok());

        let strict = PreprocessConfig::default().with_sub_shape_policy(SubShapePolicy::Strict);
        let mut scene = scene_with("head_abs", mesh);
        assert!(matches!(
            Preprocessor::new(strict).run(&mut scene, "head_abs", None),
            Err(PreprocessError::MissingSubShape { .. })
        ));
        assert!(!scene.contains("head_rel"));
    }

    #[test]
    fn selectors_are_stripped() {
        let mut mesh = head();
        mesh.add_shape("Selector1").unwrap();
        mesh.add_shape("LipSelector").unwrap();
        let mut scene = scene_with("head_abs", mesh);
        let report = Preprocessor::default()
            .run(&mut scene, "head_abs", None)
            .unwrap();
        assert_eq!(report.removed_selectors, ["Selector1", "LipSelector"]);
        let out = scene.get("head_rel").unwrap();
        assert!(out.shape("Selector1").is_none());
        assert_eq!(out.shapes().len(), 7);
    }

    #[test]
    fn existing_output_without_overwrite() {
        let mut scene = scene_with("head_abs", head());
        scene.insert("head_rel", RigMesh::default());
        let config = PreprocessConfig::default().with_overwrite(false);
        let err = Preprocessor::new(config)
            .run(&mut scene, "head_abs", None)
            .unwrap_err();
        assert!(matches!(err, PreprocessError::DuplicationFailed { .. }));
        assert!(scene.get("head_rel").unwrap().is_empty());
    }

    #[test]
    fn scripted_run() {
        let mut scene = scene_with("head_abs", head());
        let mut script = |ctx: &mut ScriptContext<'_>| -> ScriptResult<()> {
            ctx.select_indices([0]);
            ctx.visualise_selection(0)?;
            ctx.add("A", 1.0)?;
            ctx.save_delta("Extra")
        };
        let report = Preprocessor::default()
            .run(&mut scene, "head_abs", Some(&mut script))
            .unwrap();

        assert!(report.converted.is_empty());
        assert_eq!(report.removed_selectors, ["Selector0"]);
        let out = scene.get("head_rel").unwrap();
        // Scripts replace the default conversion
        assert_relative_eq!(delta(out, "A_B", 0).x, 1.0);
        assert_relative_eq!(delta(out, "Extra", 0).x, 1.0);
        assert!(out.shape("Selector0").is_none());
    }

    #[test]
    fn failed_script_removes_output() {
        let mut scene = scene_with("head_abs", head());
        let mut script = |ctx: &mut ScriptContext<'_>| -> ScriptResult<()> {
            ctx.select_all();
            ctx.save_delta("Partial")?;
            Err(ScriptError::Failed("boom".to_string()))
        };
        let err = Preprocessor::default()
            .run(&mut scene, "head_abs", Some(&mut script))
            .unwrap_err();
        assert!(matches!(err, PreprocessError::ScriptFailure { ref mesh, .. } if mesh == "head_rel"));
        assert_eq!(scene.names(), ["head_abs"]);
    }

    #[test]
    fn rank_timing_average() {
        let timing = RankTiming {
            rank: 2,
            shapes: 4,
            elapsed: Duration::from_millis(8),
        };
        assert_eq!(timing.average(), Duration::from_millis(2));
        let empty = RankTiming {
            rank: 3,
            shapes: 0,
            elapsed: Duration::from_millis(8),
        };
        assert_eq!(empty.average(), Duration::ZERO);
    }
}
