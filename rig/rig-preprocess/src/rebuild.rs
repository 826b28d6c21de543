//! Rebuilding absolute correctives from a relative mesh.

use std::time::Instant;

use rig_algebra::convert_to_absolute;
use rig_types::RigMesh;
use tracing::{debug, error, info};

use crate::error::{PreprocessError, PreprocessResult};
use crate::host::MeshRegistry;
use crate::preprocess::{check_names, check_topology, duplicate, PreprocessReport, RankTiming};
use crate::Preprocessor;

impl Preprocessor {
    /// Copy `mesh_name` to `mesh_name + rebuilt_suffix` and turn its
    /// relative correctives back into absolute sculpts.
    ///
    /// Ranks are converted from the highest down to 2, so each corrective
    /// is rebuilt while its sub-shapes are still relative.
    ///
    /// # Errors
    ///
    /// Validates like [`run`](Self::run): [`PreprocessError::InputNotFound`],
    /// [`PreprocessError::InvalidNaming`],
    /// [`PreprocessError::RedundantCorrective`],
    /// [`PreprocessError::NoShapeData`] and
    /// [`PreprocessError::MismatchedTopology`], plus
    /// [`PreprocessError::NothingToConvert`] when the mesh has no
    /// correctives. None of these writes anything. A conversion error
    /// deletes the output mesh before returning.
    pub fn rebuild_absolute<R: MeshRegistry + ?Sized>(
        &self,
        registry: &mut R,
        mesh_name: &str,
    ) -> PreprocessResult<PreprocessReport> {
        self.config().validate()?;
        let mesh = registry
            .get(mesh_name)
            .ok_or_else(|| PreprocessError::InputNotFound {
                name: mesh_name.to_owned(),
            })?;
        check_names(mesh, mesh_name)?;
        if mesh.max_rank() < 2 {
            info!(mesh = mesh_name, "No correctives to rebuild");
            return Err(PreprocessError::NothingToConvert {
                name: mesh_name.to_owned(),
            });
        }
        if !mesh.has_shape_data() {
            return Err(PreprocessError::NoShapeData {
                name: mesh_name.to_owned(),
            });
        }
        check_topology(mesh)?;

        let output = format!("{mesh_name}{}", self.config().rebuilt_suffix);
        info!(mesh = mesh_name, output = %output, "Rebuilding absolute correctives");
        duplicate(registry, mesh_name, &output, self.config().overwrite)?;

        let result = registry
            .get_mut(&output)
            .ok_or_else(|| PreprocessError::InputNotFound {
                name: output.clone(),
            })
            .and_then(|mesh| self.rebuild(mesh, &output));

        result.map_err(|e| {
            error!(mesh = %output, error = %e, "Rebuild failed, removing output");
            registry.delete(&output);
            e
        })
    }

    fn rebuild(&self, mesh: &mut RigMesh, output: &str) -> PreprocessResult<PreprocessReport> {
        let max_rank = mesh.max_rank();
        let mut report = PreprocessReport {
            output: output.to_owned(),
            max_rank,
            ..PreprocessReport::default()
        };

        for rank in (2..=max_rank).rev() {
            let start = Instant::now();
            let names = mesh.shapes().names_of_rank(rank);
            for name in &names {
                convert_to_absolute(mesh, name, self.config().sub_shape_policy)
                    .map_err(|e| PreprocessError::from_algebra(name, e))?;
                debug!(shape = %name, "Converted to absolute");
            }
            report.timings.push(RankTiming {
                rank,
                shapes: names.len(),
                elapsed: start.elapsed(),
            });
            report.converted.extend(names);
        }

        info!(
            mesh = output,
            shapes = report.converted.len(),
            "Rebuild done"
        );
        Ok(report)
    }
}
