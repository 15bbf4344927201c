/// One-shot vertex jitter for geometries
use rand::Rng;

use crate::geometry::Geometry;

/// Move every vertex coordinate by an independent uniform offset in
/// `[-offset / 2, offset / 2)` and recompute the vertex normals.
///
/// Apply once per geometry: every call shifts the vertices again.
pub fn distort<R: Rng + ?Sized>(mut geometry: Geometry, offset: f32, rng: &mut R) -> Geometry {
    for position in &mut geometry.positions {
        for axis in 0..3 {
            position[axis] += (rng.random::<f32>() - 0.5) * offset;
        }
    }
    geometry.compute_vertex_normals();
    log::trace!(
        "distorted {} vertices by up to {}",
        geometry.vertex_count(),
        offset / 2.0
    );
    geometry
}
