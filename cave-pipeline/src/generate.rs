//! The sequential stage driver.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use cave_displace::{displace_mesh, DisplacementField, PenitenteParams, ScallopParams};
use cave_extrude::{build_tube, orient_inward};
use cave_path::{generate_path, PathParams};
use cave_subdivide::{smooth_mesh, SmoothParams};
use cave_topology::{
    arch_cut, split_all_edges, split_by_segment, ArchParams, SegmentWindow, TopologyError,
};
use cave_types::PolyMesh;

use crate::cancel::CancelToken;
use crate::config::{CaveConfig, SplitMode, SCALLOP_SCALE_RANGE};
use crate::error::{CaveError, GenerationFailure, Stage};
use crate::output::CaveOutput;

/// Generate a cave from a configuration.
///
/// Equivalent to [`generate_with_cancel`] without a cancel token.
///
/// # Errors
///
/// Returns a [`GenerationFailure`] naming the failing stage; see the
/// crate docs for the propagation policy.
pub fn generate(config: &CaveConfig) -> Result<CaveOutput, GenerationFailure> {
    generate_with_cancel(config, None)
}

/// Generate a cave, checking a cancel token between stages.
///
/// Configuration errors are caught eagerly before any mesh work. A
/// failed arch cut is logged and skipped. Every other mid-pipeline
/// error aborts the run and carries the mesh that existed before the
/// failing stage.
///
/// # Errors
///
/// Returns a [`GenerationFailure`] naming the failing stage.
pub fn generate_with_cancel(
    config: &CaveConfig,
    cancel: Option<&CancelToken>,
) -> Result<CaveOutput, GenerationFailure> {
    config
        .validate()
        .map_err(|e| fail(Stage::Config, e.into(), None))?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    // Fixed draw order keeps one seed reproducible end to end: the
    // scallop diameter (when not configured), both noise seeds, then
    // the path
    let (lo, hi) = SCALLOP_SCALE_RANGE;
    let scallop_scale = config
        .scallop_scale
        .unwrap_or_else(|| rng.gen_range(lo..=hi));
    let scallop_seed: u32 = rng.gen();
    let penitente_seed: u32 = rng.gen();

    check(cancel, Stage::Path, None)?;
    let path_params = PathParams::new()
        .with_zones(config.zones)
        .with_size(config.size)
        .with_y_curve(config.y_curve)
        .with_z_curve(config.z_curve);
    let path = generate_path(&path_params, &mut rng)
        .map_err(|e| fail(Stage::Path, e.into(), None))?;
    debug!(zones = path.len(), "path generated");

    check(cancel, Stage::Extrude, None)?;
    let tube = build_tube(config.size, &path)
        .map_err(|e| fail(Stage::Extrude, e.into(), None))?;
    let mut mesh = tube.mesh;
    let windows: Vec<SegmentWindow> = tube.segments.iter().map(|s| s.sides).collect();
    let tube_vertices = mesh.vertex_count();
    let tube_faces = mesh.face_count();

    orient_inward(&mut mesh);

    let mut arch_edge = None;
    if config.arch {
        check(cancel, Stage::ArchCut, Some(&mesh))?;
        match arch_cut(&mesh, &ArchParams::default()) {
            Ok(outcome) => {
                debug!(
                    edge_index = outcome.edge_index,
                    rejected = outcome.failures.len(),
                    "arch profile applied"
                );
                arch_edge = Some(outcome.edge_index);
                mesh = outcome.mesh;
            }
            // Non-fatal: the cave keeps its round bottom
            Err(err @ TopologyError::ArchCutFailed { .. }) => {
                warn!(error = %err, "arch cut failed, continuing with unmodified tube");
            }
            Err(err) => return Err(fail(Stage::ArchCut, err.into(), Some(&mesh))),
        }
    }

    let parts: Vec<PolyMesh> = match config.split {
        None => vec![mesh],
        Some(SplitMode::Segments(strategy)) => {
            check(cancel, Stage::Split, Some(&mesh))?;
            split_by_segment(&mesh, &windows, strategy)
                .map_err(|e| fail(Stage::Split, e.into(), Some(&mesh)))?
        }
        Some(SplitMode::Faces) => {
            check(cancel, Stage::Split, Some(&mesh))?;
            split_all_edges(&mesh).map_err(|e| fail(Stage::Split, e.into(), Some(&mesh)))?
        }
    };

    let smooth_params = SmoothParams::default().with_levels(config.resolution);
    let mut smoothed = Vec::with_capacity(parts.len());
    for part in &parts {
        check(cancel, Stage::Smooth, Some(part))?;
        let result = smooth_mesh(part, &smooth_params)
            .map_err(|e| fail(Stage::Smooth, e.into(), Some(part)))?;
        debug!(%result, "part smoothed");
        smoothed.push(result.mesh);
    }

    let scallop =
        DisplacementField::Scallop(ScallopParams::new(scallop_scale).with_seed(scallop_seed));
    let mut meshes = Vec::with_capacity(smoothed.len());
    for part in &smoothed {
        check(cancel, Stage::Scallop, Some(part))?;
        meshes.push(
            displace_mesh(part, &scallop)
                .map_err(|e| fail(Stage::Scallop, e.into(), Some(part)))?,
        );
    }

    if config.penitentes {
        let field =
            DisplacementField::Penitente(PenitenteParams::default().with_seed(penitente_seed));
        let mut spiked = Vec::with_capacity(meshes.len());
        for part in &meshes {
            check(cancel, Stage::Penitente, Some(part))?;
            spiked.push(
                displace_mesh(part, &field)
                    .map_err(|e| fail(Stage::Penitente, e.into(), Some(part)))?,
            );
        }
        meshes = spiked;
    }

    let final_vertices = meshes.iter().map(PolyMesh::vertex_count).sum();
    let final_faces = meshes.iter().map(PolyMesh::face_count).sum();
    let output = CaveOutput {
        meshes,
        path,
        scallop_scale,
        arch_edge,
        tube_vertices,
        tube_faces,
        final_vertices,
        final_faces,
    };
    info!(%output, "generation complete");
    Ok(output)
}

fn fail(stage: Stage, error: CaveError, partial: Option<&PolyMesh>) -> GenerationFailure {
    GenerationFailure {
        stage,
        error,
        partial: partial.cloned(),
    }
}

fn check(
    cancel: Option<&CancelToken>,
    stage: Stage,
    partial: Option<&PolyMesh>,
) -> Result<(), GenerationFailure> {
    match cancel {
        Some(token) if token.is_cancelled() => {
            Err(fail(stage, CaveError::Cancelled, partial))
        }
        _ => Ok(()),
    }
}
