//! API Regression Tests for the rig crate ecosystem
//!
//! These tests pin the public API and the end-to-end behaviour of the
//! corrective pipeline. They are organized in 5 tiers:
//!
//! - Tier 1: Names (rig-names)
//! - Tier 2: Selection (rig-types weights, rig-select)
//! - Tier 3: Shape algebra (rig-algebra)
//! - Tier 4: Preprocessing (rig-preprocess)
//! - Tier 5: Scripting (rig-preprocess command scripts)
//!
//! If any of these tests fail after API changes, it indicates a breaking change
//! that needs documentation in CHANGELOG.md and a version bump.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::float_cmp)]

use approx::assert_relative_eq;
use rig::{algebra, names, preprocess, prelude::*, select, types};

/// Base pose: a 3x3 grid in the XY plane, spacing 1, centered on x = 0.
fn grid() -> RigMesh {
    let mut vertices = Vec::new();
    for row in 0..3 {
        for col in 0..3 {
            vertices.push(Point3::new(f64::from(col) - 1.0, f64::from(row), 0.0));
        }
    }
    let mut faces = Vec::new();
    for row in 0..2_u32 {
        for col in 0..2_u32 {
            let v = row * 3 + col;
            faces.push([v, v + 1, v + 4]);
            faces.push([v, v + 4, v + 3]);
        }
    }
    RigMesh::new(vertices, faces)
}

/// Base positions moved by a constant offset.
fn moved(mesh: &RigMesh, offset: Vector3<f64>) -> Vec<Point3<f64>> {
    mesh.vertices.iter().map(|p| p + offset).collect()
}

fn delta(mesh: &RigMesh, shape: &str, vertex: usize) -> Vector3<f64> {
    mesh.shape(shape).unwrap().positions[vertex] - mesh.vertices[vertex]
}

// =============================================================================
// TIER 1: Names
// =============================================================================

mod tier1_names {
    use super::*;

    #[test]
    fn rank_counts_components() {
        assert_eq!(rank("JawOpen"), 1);
        assert_eq!(rank("JawOpen_Smile"), 2);
        assert_eq!(rank("JawOpen_Smile_Pucker"), 3);
    }

    #[test]
    fn sub_shapes_are_proper_subsets() {
        let subs: Vec<String> = sub_shape_names("A_B_C").collect();
        assert_eq!(subs.len(), 6);
        for expected in ["A", "B", "C", "A_B", "A_C", "B_C"] {
            assert!(subs.iter().any(|s| s == expected), "missing {expected}");
        }
        assert!(!subs.iter().any(|s| s == "A_B_C"));
        assert_eq!(sub_shape_names("A").count(), 0);

        let pair: Vec<String> = sub_shape_names("A_B").collect();
        assert_eq!(pair.len(), 2);
    }

    #[test]
    fn validation_and_redundancy() {
        assert!(names::validate_names(["JawOpen", "Smile", "JawOpen_Smile"]).is_ok());
        assert!(names::validate_names(["JawOpen", "12Bad"]).is_err());

        let err = names::check_redundancy(["X_Y", "Y_X"]).unwrap_err();
        assert!(matches!(err, names::NameError::AmbiguousCorrectives { .. }));
    }

    #[test]
    fn shape_name_parsing() {
        let name: ShapeName = "Blink_Squint".parse().unwrap();
        assert_eq!(name.rank(), 2);
        assert!(name.is_corrective());
        assert!("A__B".parse::<ShapeName>().is_err());
    }
}

// =============================================================================
// TIER 2: Selection
// =============================================================================

mod tier2_selection {
    use super::*;

    #[test]
    fn union_then_subtract_excludes_subtrahend() {
        let a = select::select([0, 1, 2]);
        let b: VertexWeights = [(2, 0.5), (5, 1.0)].into_iter().collect();
        let result = select::subtract(&select::union(&a, &b), &b);
        assert!(!result.contains(2));
        assert!(!result.contains(5));
        assert!(result.contains(0));
        assert!(result.contains(1));
    }

    #[test]
    fn intersect_keeps_hard_overlap() {
        let a: VertexWeights = [(0, 1.0), (1, 0.25), (2, 1.0)].into_iter().collect();
        let b: VertexWeights = [(0, 1.0), (1, 1.0), (3, 1.0)].into_iter().collect();
        let result = select::intersect(&a, &b);
        assert_eq!(result.to_sorted_vec(), vec![(0, 1.0)]);
    }

    #[test]
    fn grow_and_shrink_on_grid() {
        let mesh = grid();
        let adjacency = mesh.adjacency();
        let corner = select::select([0]);
        let grown = select::grow(&adjacency, &corner);
        assert!(grown.contains(0) && grown.contains(1) && grown.contains(3) && grown.contains(4));
        assert!(grown.is_hard_selection());

        let shrunk = select::shrink(&adjacency, &grown);
        assert_eq!(shrunk.to_sorted_vec(), vec![(0, 1.0)]);

        let all = select::select_all(mesh.vertex_count());
        assert_eq!(select::shrink(&adjacency, &all).len(), mesh.vertex_count());
    }

    #[test]
    fn select_half_splits_on_x() {
        let mesh = grid();
        let all = select::select_all(mesh.vertex_count());
        let left = select::select_half(&mesh.vertices, &all, Side::Left);
        let right = select::select_half(&mesh.vertices, &all, Side::Right);
        // The center column sits on both sides
        assert_eq!(left.len(), 6);
        assert_eq!(right.len(), 6);
        assert!(left.contains(1) && right.contains(1));
    }

    #[test]
    fn soft_selection_linear_falloff() {
        let positions: Vec<_> = (0..4).map(|i| Point3::new(f64::from(i), 0.0, 0.0)).collect();
        let adjacency = types::Adjacency::from_edges(4, &[[0, 1], [1, 2], [2, 3]]);
        let selector = SoftSelector::from_parts(&positions, adjacency);
        let params = SoftSelectParams::new()
            .with_max_distance(1.0)
            .with_falloff(Falloff::Linear);

        let result = selector.propagate(&select::select([0]), &params);
        assert_relative_eq!(result.weight(0), 1.0);
        assert_relative_eq!(result.weight(1), 0.5);
        assert!(!result.contains(2));
        assert!(!result.contains(3));
    }

    #[test]
    fn soft_selection_zero_distance_keeps_seed() {
        let mesh = grid();
        let params = SoftSelectParams::new().with_max_distance(0.0);
        let seed = select::select([4]);
        let result = select::soft_select(&mesh, &seed, &params);
        assert_eq!(result.to_sorted_vec(), vec![(4, 1.0)]);
    }

    #[test]
    fn soft_selection_ignores_soft_seeds() {
        let mesh = grid();
        let seed: VertexWeights = [(4, 0.5)].into_iter().collect();
        let result = select::soft_select(&mesh, &seed, &SoftSelectParams::default());
        assert!(result.is_empty());
    }

    #[test]
    fn seeded_random_falloff_is_reproducible() {
        let mesh = grid();
        let params = SoftSelectParams::new()
            .with_falloff(Falloff::Random)
            .with_seed(42);
        let seed = select::select([4]);
        let first = select::soft_select(&mesh, &seed, &params);
        let second = select::soft_select(&mesh, &seed, &params);
        assert_eq!(first.to_sorted_vec(), second.to_sorted_vec());
    }
}

// =============================================================================
// TIER 3: Shape algebra
// =============================================================================

mod tier3_algebra {
    use super::*;

    #[test]
    fn add_through_partial_selection() {
        let mut mesh = grid();
        mesh.set_shape_positions("Raise", moved(&mesh, Vector3::new(0.0, 0.0, 2.0)))
            .unwrap();
        mesh.set_shape_positions("Target", mesh.vertices.clone()).unwrap();

        let weights: VertexWeights = [(0, 1.0), (1, 0.5)].into_iter().collect();
        algebra::add_layer(&mut mesh, &weights, "Raise", "Target", 1.0).unwrap();

        assert_relative_eq!(delta(&mesh, "Target", 0).z, 2.0);
        assert_relative_eq!(delta(&mesh, "Target", 1).z, 1.0);
        assert_relative_eq!(delta(&mesh, "Target", 2).z, 0.0);
    }

    #[test]
    fn mismatched_layers_are_rejected() {
        let mesh = grid();
        let short = vec![Point3::origin(); 2];
        let err = algebra::delta_coordinates(&mesh.vertices, &short).unwrap_err();
        assert!(matches!(err, algebra::AlgebraError::ShapeMismatch { .. }));
    }

    #[test]
    fn absolute_relative_round_trip() {
        let mut mesh = grid();
        mesh.set_shape_positions("A", moved(&mesh, Vector3::new(1.0, 0.0, 0.0))).unwrap();
        mesh.set_shape_positions("B", moved(&mesh, Vector3::new(0.0, 1.0, 0.0))).unwrap();
        let sculpt = moved(&mesh, Vector3::new(1.0, 1.0, 0.3));
        mesh.set_shape_positions("A_B", sculpt.clone()).unwrap();

        convert_to_relative(&mut mesh, "A_B", SubShapePolicy::Lenient).unwrap();
        assert_relative_eq!(delta(&mesh, "A_B", 4).norm(), 0.3, epsilon = 1e-12);

        convert_to_absolute(&mut mesh, "A_B", SubShapePolicy::Lenient).unwrap();
        for (got, want) in mesh.shape("A_B").unwrap().positions.iter().zip(&sculpt) {
            assert_relative_eq!((got - want).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn missing_rank_two_sub_shape_is_fatal() {
        let mut mesh = grid();
        for name in ["A", "B", "C"] {
            mesh.add_shape(name).unwrap();
        }
        mesh.add_shape("A_B_C").unwrap();
        let err = convert_to_relative(&mut mesh, "A_B_C", SubShapePolicy::Lenient).unwrap_err();
        assert!(matches!(err, algebra::AlgebraError::MissingSubShape { .. }));
    }

    #[test]
    fn soft_blend_same_shape_is_noop() {
        let mut mesh = grid();
        mesh.set_shape_positions("A", moved(&mesh, Vector3::new(1.0, 0.0, 0.0))).unwrap();
        let before = mesh.clone();
        let weights = algebra::soft_blend(
            &mut mesh,
            &select::select([4]),
            "A",
            "a",
            &algebra::SoftBlendParams::default(),
        )
        .unwrap();
        assert!(weights.is_empty());
        assert_eq!(mesh, before);
    }
}

// =============================================================================
// TIER 4: Preprocessing
// =============================================================================

mod tier4_preprocess {
    use super::*;

    fn head_abs() -> RigMesh {
        let mut mesh = grid();
        mesh.set_shape_positions("A", moved(&mesh, Vector3::new(1.0, 0.0, 0.0))).unwrap();
        mesh.set_shape_positions("B", moved(&mesh, Vector3::new(0.0, 1.0, 0.0))).unwrap();
        mesh.set_shape_positions("A_B", moved(&mesh, Vector3::new(1.0, 1.0, 0.5))).unwrap();
        mesh.shape_mut("A").unwrap().value = 0.7;
        mesh
    }

    #[test]
    fn end_to_end_conversion() {
        let mut scene = Scene::new();
        scene.insert("head_abs", head_abs());

        let report = Preprocessor::default().run(&mut scene, "head_abs", None).unwrap();
        assert_eq!(report.output, "head_rel");
        assert_eq!(report.max_rank, 2);
        assert_eq!(report.converted, ["A_B"]);

        let out = scene.get("head_rel").unwrap();
        for vertex in 0..out.vertex_count() {
            let d = delta(out, "A_B", vertex);
            assert_relative_eq!(d.x, 0.0, epsilon = 1e-12);
            assert_relative_eq!(d.y, 0.0, epsilon = 1e-12);
            assert_relative_eq!(d.z, 0.5, epsilon = 1e-12);
        }
        assert!(out.shapes().iter().all(|layer| layer.value == 0.0));
        // Rank 1 shapes are untouched
        assert_relative_eq!(delta(out, "A", 0).x, 1.0);
    }

    #[test]
    fn redundant_correctives_create_nothing() {
        let mut mesh = grid();
        for name in ["X", "Y", "X_Y", "Y_X"] {
            mesh.add_shape(name).unwrap();
        }
        let mut scene = Scene::new();
        scene.insert("head_abs", mesh);

        let err = Preprocessor::default().run(&mut scene, "head_abs", None).unwrap_err();
        assert!(matches!(err, PreprocessError::RedundantCorrective { .. }));
        assert_eq!(scene.names(), ["head_abs"]);
    }

    #[test]
    fn script_failure_leaves_no_output() {
        let mut scene = Scene::new();
        scene.insert("head_abs", head_abs());

        let mut script: CommandScript = "Select all\nSetState Missing".parse().unwrap();
        let err = Preprocessor::default()
            .run(&mut scene, "head_abs", Some(&mut script))
            .unwrap_err();
        assert!(matches!(err, PreprocessError::ScriptFailure { .. }));
        assert!(!scene.contains("head_rel"));
    }

    #[test]
    fn rebuild_round_trip() {
        let mut scene = Scene::new();
        scene.insert("head_abs", head_abs());
        let preprocessor = Preprocessor::default();
        preprocessor.run(&mut scene, "head_abs", None).unwrap();

        let report = preprocessor.rebuild_absolute(&mut scene, "head_rel").unwrap();
        assert_eq!(report.output, "head_rel_absolute_correctors");

        let original = scene.get("head_abs").unwrap();
        let rebuilt = scene.get("head_rel_absolute_correctors").unwrap();
        let original_ab = &original.shape("A_B").unwrap().positions;
        let rebuilt_ab = &rebuilt.shape("A_B").unwrap().positions;
        for (got, want) in rebuilt_ab.iter().zip(original_ab) {
            assert_relative_eq!((got - want).norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn custom_suffixes() {
        let mut scene = Scene::new();
        scene.insert("face.sculpt", head_abs());
        let config = PreprocessConfig::default()
            .with_absolute_suffix(".sculpt")
            .with_relative_suffix(".export");

        let report = Preprocessor::new(config).run(&mut scene, "face.sculpt", None).unwrap();
        assert_eq!(report.output, "face.export");
        assert!(scene.contains("face.export"));
    }

    #[test]
    fn errors_display_context() {
        let mut scene = Scene::new();
        let err = Preprocessor::default().run(&mut scene, "ghost_abs", None).unwrap_err();
        assert!(err.to_string().contains("ghost_abs"));
    }
}

// =============================================================================
// TIER 5: Scripting
// =============================================================================

mod tier5_scripting {
    use super::*;
    use preprocess::{Capability, ScriptError};

    #[test]
    fn capability_table() {
        assert_eq!(preprocess::CAPABILITY_TABLE_VERSION, 1);
        assert_eq!(Capability::ALL.len(), 16);
        assert_eq!("savedelta".parse::<Capability>().unwrap(), Capability::SaveDelta);
    }

    #[test]
    fn command_errors_carry_line_numbers() {
        let source = "Select all\n\n# comment\nAdd Missing 1.0\n";
        let mut script: CommandScript = source.parse().unwrap();

        let mut mesh = grid();
        let err = script.run(&mut ScriptContext::new(&mut mesh)).unwrap_err();
        match err {
            ScriptError::Command { line, command, .. } => {
                assert_eq!(line, 4);
                assert_eq!(command, "Add");
            }
            other => panic!("unexpected error {other}"),
        }

        let err = "Select all\nTeleport 1".parse::<CommandScript>().unwrap_err();
        assert!(matches!(err, ScriptError::UnknownCommand { line: 2, .. }));
    }

    #[test]
    fn scripted_split_into_halves() {
        let mut mesh = grid();
        mesh.set_shape_positions("Blink", moved(&mesh, Vector3::new(0.0, 0.0, 1.0)))
            .unwrap();
        mesh.add_shape("Squint").unwrap();
        let mut scene = Scene::new();
        scene.insert("face_abs", mesh);

        let mut script: CommandScript = "
            Select all
            SelectHalf left
            VisualiseSel 0
            Add Blink
            SaveDelta BlinkL
            ResetState
            Select all
            SelectHalf right
            Add Blink
            SaveDelta BlinkR
        "
        .parse()
        .unwrap();

        let report = Preprocessor::default()
            .run(&mut scene, "face_abs", Some(&mut script))
            .unwrap();
        assert_eq!(report.removed_selectors, ["Selector0"]);

        let out = scene.get("face_rel").unwrap();
        // Vertex 0 is at x = -1, vertex 2 at x = 1
        assert_relative_eq!(delta(out, "BlinkL", 2).z, 1.0);
        assert_relative_eq!(delta(out, "BlinkL", 0).z, 0.0);
        assert_relative_eq!(delta(out, "BlinkR", 0).z, 1.0);
        assert_relative_eq!(delta(out, "BlinkR", 2).z, 0.0);
        assert!(out.shape("Selector0").is_none());
    }

    #[test]
    fn closure_scripts_override_correctives() {
        let mut mesh = grid();
        mesh.set_shape_positions("A", moved(&mesh, Vector3::new(1.0, 0.0, 0.0))).unwrap();
        mesh.set_shape_positions("B", moved(&mesh, Vector3::new(0.0, 1.0, 0.0))).unwrap();
        mesh.add_shape("A_B").unwrap();
        let mut scene = Scene::new();
        scene.insert("head_abs", mesh);

        let mut script = |ctx: &mut ScriptContext<'_>| -> preprocess::ScriptResult<()> {
            ctx.select_all();
            ctx.add("A", 1.0)?;
            ctx.add("B", 1.0)?;
            ctx.translate(&Vector3::new(0.0, 0.0, 0.25));
            ctx.override_corrector("A_B")
        };
        Preprocessor::default()
            .run(&mut scene, "head_abs", Some(&mut script))
            .unwrap();

        let out = scene.get("head_rel").unwrap();
        let d = delta(out, "A_B", 8);
        assert_relative_eq!(d.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.z, 0.25, epsilon = 1e-12);
    }
}
