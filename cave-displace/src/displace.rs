//! Per-vertex displacement evaluation.

use nalgebra::{Point3, Vector3};
use noise::{NoiseFn, Perlin, Worley};
use rayon::prelude::*;
use tracing::debug;

use cave_types::{PolyMesh, VertexKey};

use crate::error::{DisplaceError, DisplaceResult};
use crate::field::{DisplacementField, PenitenteParams, ScallopParams};

/// Apply a displacement field to every vertex.
///
/// The input mesh is not modified; the displaced copy is returned.
/// Scallop displacement moves each vertex along its local normal
/// (computing normals from incident faces when the mesh carries none);
/// penitente displacement moves vertices along the field's fixed world
/// axis. Vertices whose normal cannot be derived (degenerate
/// neighborhoods) are left in place.
///
/// Evaluation is parallel across vertices but fully deterministic: the
/// output depends only on the mesh and the field's seed.
///
/// # Errors
///
/// Returns an error if the mesh has no vertices, the field's scale is
/// not positive and finite, the octave count is 0, or the axis is
/// zero-length.
pub fn displace_mesh(mesh: &PolyMesh, field: &DisplacementField) -> DisplaceResult<PolyMesh> {
    if mesh.vertex_count() == 0 {
        return Err(DisplaceError::EmptyMesh);
    }
    validate(field)?;

    let mut out = mesh.clone();
    match field {
        DisplacementField::Scallop(params) => displace_scallop(&mut out, params),
        DisplacementField::Penitente(params) => displace_penitente(&mut out, params),
    }

    debug!(
        field = field.name(),
        vertices = out.vertex_count(),
        "displacement applied"
    );
    Ok(out)
}

fn validate(field: &DisplacementField) -> DisplaceResult<()> {
    match field {
        DisplacementField::Scallop(p) => {
            if !(p.scale.is_finite() && p.scale > 0.0) {
                return Err(DisplaceError::InvalidScale(p.scale));
            }
        }
        DisplacementField::Penitente(p) => {
            if !(p.scale.is_finite() && p.scale > 0.0) {
                return Err(DisplaceError::InvalidScale(p.scale));
            }
            if p.octaves == 0 {
                return Err(DisplaceError::InvalidOctaves(0));
            }
            if p.axis.norm_squared() < f64::EPSILON {
                return Err(DisplaceError::ZeroAxis);
            }
        }
    }
    Ok(())
}

fn displace_scallop(mesh: &mut PolyMesh, params: &ScallopParams) {
    if mesh.vertices().any(|(_, v)| v.normal.is_none()) {
        mesh.compute_vertex_normals();
    }

    let entries: Vec<(VertexKey, Point3<f64>, Option<Vector3<f64>>)> = mesh
        .vertices()
        .map(|(key, v)| (key, v.position, v.normal))
        .collect();

    let amount = params.strength * params.intensity;
    let scale = params.scale;
    let seed = params.seed;

    let displaced: Vec<Point3<f64>> = entries
        .par_iter()
        .map_init(
            || Worley::new(seed),
            |noise, &(_, position, normal)| match normal {
                Some(n) => {
                    let value =
                        noise.get([position.x * scale, position.y * scale, position.z * scale]);
                    position + n * (value * amount)
                }
                None => position,
            },
        )
        .collect();

    write_back(mesh, &entries, &displaced);
}

fn displace_penitente(mesh: &mut PolyMesh, params: &PenitenteParams) {
    let entries: Vec<(VertexKey, Point3<f64>, Option<Vector3<f64>>)> = mesh
        .vertices()
        .map(|(key, v)| (key, v.position, v.normal))
        .collect();

    let axis = params.axis.normalize();
    let amount = params.strength * params.intensity;
    let params = *params;

    let displaced: Vec<Point3<f64>> = entries
        .par_iter()
        .map_init(
            || Perlin::new(params.seed),
            |noise, &(_, position, _)| {
                let value = fractal_value(noise, &params, position);
                position + axis * (value * amount)
            },
        )
        .collect();

    write_back(mesh, &entries, &displaced);
}

/// Multi-octave fractal value with per-octave gain derived from the
/// spectral dimension: `gain = lacunarity^(-dimension)`.
fn fractal_value(noise: &Perlin, params: &PenitenteParams, position: Point3<f64>) -> f64 {
    let gain = params.lacunarity.powf(-params.dimension);

    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = params.scale;
    let mut max_value = 0.0;

    for _ in 0..params.octaves {
        total += noise.get([
            position.x * frequency,
            position.y * frequency,
            position.z * frequency,
        ]) * amplitude;
        max_value += amplitude;
        amplitude *= gain;
        frequency *= params.lacunarity;
    }

    total / max_value
}

fn write_back(
    mesh: &mut PolyMesh,
    entries: &[(VertexKey, Point3<f64>, Option<Vector3<f64>>)],
    displaced: &[Point3<f64>],
) {
    for (&(key, _, _), &position) in entries.iter().zip(displaced) {
        if let Some(vertex) = mesh.vertex_mut(key) {
            vertex.position = position;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cave_types::Vertex;

    fn flat_grid() -> PolyMesh {
        let mut mesh = PolyMesh::new();
        let mut keys = Vec::new();
        for y in 0..3i32 {
            for x in 0..3i32 {
                keys.push(mesh.add_vertex(Vertex::from_coords(f64::from(x), f64::from(y), 0.0)));
            }
        }
        for y in 0..2usize {
            for x in 0..2usize {
                let i = y * 3 + x;
                mesh.add_face(vec![keys[i], keys[i + 1], keys[i + 4], keys[i + 3]]);
            }
        }
        mesh
    }

    fn scallop_field(seed: u32) -> DisplacementField {
        DisplacementField::Scallop(ScallopParams::new(0.5).with_seed(seed))
    }

    #[test]
    fn empty_mesh_rejected() {
        let mesh = PolyMesh::new();
        let result = displace_mesh(&mesh, &scallop_field(0));
        assert!(matches!(result, Err(DisplaceError::EmptyMesh)));
    }

    #[test]
    fn invalid_scale_rejected() {
        let mesh = flat_grid();
        let field = DisplacementField::Scallop(ScallopParams::new(0.0));
        assert!(matches!(
            displace_mesh(&mesh, &field),
            Err(DisplaceError::InvalidScale(_))
        ));
    }

    #[test]
    fn zero_octaves_rejected() {
        let mesh = flat_grid();
        let mut params = PenitenteParams::default();
        params.octaves = 0;
        let result = displace_mesh(&mesh, &DisplacementField::Penitente(params));
        assert!(matches!(result, Err(DisplaceError::InvalidOctaves(0))));
    }

    #[test]
    fn scallop_preserves_topology() {
        let mesh = flat_grid();
        let rough = displace_mesh(&mesh, &scallop_field(42)).unwrap();
        assert_eq!(rough.vertex_count(), mesh.vertex_count());
        assert_eq!(rough.face_count(), mesh.face_count());
        assert_eq!(rough.to_buffers().faces, mesh.to_buffers().faces);
    }

    #[test]
    fn scallop_moves_along_normals_only() {
        // Flat grid normals are all +Z, so X and Y must not move
        let mesh = flat_grid();
        let rough = displace_mesh(&mesh, &scallop_field(42)).unwrap();
        for (before, after) in mesh
            .to_buffers()
            .positions
            .iter()
            .zip(rough.to_buffers().positions.iter())
        {
            assert!((before[0] - after[0]).abs() < 1e-12);
            assert!((before[1] - after[1]).abs() < 1e-12);
        }
    }

    #[test]
    fn scallop_same_seed_reproduces() {
        let mesh = flat_grid();
        let a = displace_mesh(&mesh, &scallop_field(42)).unwrap();
        let b = displace_mesh(&mesh, &scallop_field(42)).unwrap();
        assert_eq!(a.to_buffers().positions, b.to_buffers().positions);
    }

    #[test]
    fn scallop_actually_displaces() {
        let mesh = flat_grid();
        let rough = displace_mesh(&mesh, &scallop_field(42)).unwrap();
        let moved = mesh
            .to_buffers()
            .positions
            .iter()
            .zip(rough.to_buffers().positions.iter())
            .any(|(a, b)| (a[2] - b[2]).abs() > 1e-9);
        assert!(moved, "expected at least one vertex to move");
    }

    #[test]
    fn redisplacement_moves_further() {
        // Not idempotent on mesh state: displacing the displaced mesh
        // samples the noise at new positions
        let mesh = flat_grid();
        let once = displace_mesh(&mesh, &scallop_field(42)).unwrap();
        let twice = displace_mesh(&once, &scallop_field(42)).unwrap();
        assert_ne!(
            once.to_buffers().positions,
            twice.to_buffers().positions
        );
    }

    #[test]
    fn penitente_moves_along_axis_only() {
        let mesh = flat_grid();
        let field = DisplacementField::Penitente(PenitenteParams::default().with_seed(7));
        let spiked = displace_mesh(&mesh, &field).unwrap();
        for (before, after) in mesh
            .to_buffers()
            .positions
            .iter()
            .zip(spiked.to_buffers().positions.iter())
        {
            assert!((before[0] - after[0]).abs() < 1e-12);
            assert!((before[1] - after[1]).abs() < 1e-12);
        }
    }

    #[test]
    fn penitente_same_seed_reproduces() {
        let mesh = flat_grid();
        let field = DisplacementField::Penitente(PenitenteParams::default().with_seed(7));
        let a = displace_mesh(&mesh, &field).unwrap();
        let b = displace_mesh(&mesh, &field).unwrap();
        assert_eq!(a.to_buffers().positions, b.to_buffers().positions);
    }
}
