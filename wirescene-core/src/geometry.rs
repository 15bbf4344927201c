/// Indexed triangle geometry for boxes and prisms, plus outline extraction
use nalgebra::{Point3, Vector3};
use std::collections::BTreeMap;
use std::f32::consts::TAU;

/// Positions are merged for edge detection after scaling by this factor and rounding
const MERGE_PRECISION: f32 = 1e4;

/// A line segment in the geometry's local space
pub type Segment = [Point3<f32>; 2];

/// Triangle soup with shared vertex buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub positions: Vec<Point3<f32>>,
    pub normals: Option<Vec<Vector3<f32>>>,
    pub triangles: Vec<[usize; 3]>,
}

impl Geometry {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Some(Vec::new()),
            triangles: Vec::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Append a planar quad as two triangles sharing the given normal
    fn push_quad(&mut self, corners: [Point3<f32>; 4], normal: Vector3<f32>) {
        let base = self.positions.len();
        self.positions.extend_from_slice(&corners);
        if let Some(normals) = self.normals.as_mut() {
            normals.extend_from_slice(&[normal; 4]);
        }
        self.triangles.push([base, base + 1, base + 2]);
        self.triangles.push([base, base + 2, base + 3]);
    }

    /// Append a triangle fan around `center`
    fn push_fan(&mut self, center: Point3<f32>, ring: &[Point3<f32>], normal: Vector3<f32>) {
        let base = self.positions.len();
        self.positions.push(center);
        self.positions.extend_from_slice(ring);
        if let Some(normals) = self.normals.as_mut() {
            normals.extend(std::iter::repeat(normal).take(ring.len() + 1));
        }
        let n = ring.len();
        for i in 0..n {
            self.triangles
                .push([base, base + 1 + i, base + 1 + (i + 1) % n]);
        }
    }

    /// Replace the normals with area-weighted averages of the adjacent face normals
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for &[a, b, c] in &self.triangles {
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pc - pb).cross(&(pa - pb));
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for normal in &mut normals {
            *normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        }
        self.normals = Some(normals);
    }

    /// Unit normal of one triangle, or zero when it is degenerate
    pub fn face_normal(&self, triangle: usize) -> Vector3<f32> {
        let [a, b, c] = self.triangles[triangle];
        face_normal(&self.positions[a], &self.positions[b], &self.positions[c])
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}

pub fn face_normal(a: &Point3<f32>, b: &Point3<f32>, c: &Point3<f32>) -> Vector3<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    edge1
        .cross(&edge2)
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

/// Axis-aligned box centered on the origin: four vertices per face, 24 in total
pub fn box_geometry(width: f32, height: f32, depth: f32) -> Geometry {
    let (hx, hy, hz) = (width / 2.0, height / 2.0, depth / 2.0);
    let p = Point3::new;
    let mut geometry = Geometry::new();

    // +X
    geometry.push_quad(
        [p(hx, -hy, hz), p(hx, -hy, -hz), p(hx, hy, -hz), p(hx, hy, hz)],
        Vector3::x(),
    );
    // -X
    geometry.push_quad(
        [p(-hx, -hy, -hz), p(-hx, -hy, hz), p(-hx, hy, hz), p(-hx, hy, -hz)],
        -Vector3::x(),
    );
    // +Y
    geometry.push_quad(
        [p(-hx, hy, hz), p(hx, hy, hz), p(hx, hy, -hz), p(-hx, hy, -hz)],
        Vector3::y(),
    );
    // -Y
    geometry.push_quad(
        [p(-hx, -hy, -hz), p(hx, -hy, -hz), p(hx, -hy, hz), p(-hx, -hy, hz)],
        -Vector3::y(),
    );
    // +Z
    geometry.push_quad(
        [p(-hx, -hy, hz), p(hx, -hy, hz), p(hx, hy, hz), p(-hx, hy, hz)],
        Vector3::z(),
    );
    // -Z
    geometry.push_quad(
        [p(hx, -hy, -hz), p(-hx, -hy, -hz), p(-hx, hy, -hz), p(hx, hy, -hz)],
        -Vector3::z(),
    );

    geometry
}

/// Closed prism along the Y axis with a regular `sides`-gon cross-section
///
/// Side faces get their own vertices so every face keeps a flat normal; the
/// caps are triangle fans around their centers.
pub fn prism_geometry(radius: f32, height: f32, sides: usize) -> Geometry {
    let sides = sides.max(3);
    let half = height / 2.0;
    let ring = |y: f32| -> Vec<Point3<f32>> {
        (0..sides)
            .map(|i| {
                let theta = i as f32 / sides as f32 * TAU;
                Point3::new(radius * theta.sin(), y, radius * theta.cos())
            })
            .collect()
    };
    let top = ring(half);
    let bottom = ring(-half);
    let mut geometry = Geometry::new();

    for i in 0..sides {
        let j = (i + 1) % sides;
        let corners = [bottom[i], bottom[j], top[j], top[i]];
        let normal = face_normal(&corners[0], &corners[1], &corners[2]);
        geometry.push_quad(corners, normal);
    }

    geometry.push_fan(Point3::new(0.0, half, 0.0), &top, Vector3::y());
    let reversed: Vec<Point3<f32>> = bottom.iter().rev().copied().collect();
    geometry.push_fan(Point3::new(0.0, -half, 0.0), &reversed, -Vector3::y());

    geometry
}

type MergedPoint = [i64; 3];

fn merge_key(point: &Point3<f32>) -> MergedPoint {
    [
        (point.x * MERGE_PRECISION).round() as i64,
        (point.y * MERGE_PRECISION).round() as i64,
        (point.z * MERGE_PRECISION).round() as i64,
    ]
}

struct OpenEdge {
    segment: Segment,
    normal: Vector3<f32>,
}

/// Outline segments of a geometry
///
/// A segment is emitted for every edge that borders a single triangle, and for
/// every edge whose two triangles meet at more than `threshold_degrees`.
/// Vertices closer than the merge precision are treated as the same point.
pub fn extract_edges(geometry: &Geometry, threshold_degrees: f32) -> Vec<Segment> {
    let threshold_dot = threshold_degrees.to_radians().cos();
    let mut open: BTreeMap<(MergedPoint, MergedPoint), OpenEdge> = BTreeMap::new();
    let mut edges = Vec::new();

    for (index, &triangle) in geometry.triangles.iter().enumerate() {
        let normal = geometry.face_normal(index);
        let keys = triangle.map(|v| merge_key(&geometry.positions[v]));

        // Zero-area triangles contribute no outline
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }

        for k in 0..3 {
            let next = (k + 1) % 3;
            let (a, b) = (triangle[k], triangle[next]);
            let forward = (keys[k], keys[next]);
            let reverse = (keys[next], keys[k]);

            if let Some(other) = open.remove(&reverse) {
                if normal.dot(&other.normal) <= threshold_dot {
                    edges.push(other.segment);
                }
            } else if !open.contains_key(&forward) {
                open.insert(
                    forward,
                    OpenEdge {
                        segment: [geometry.positions[a], geometry.positions[b]],
                        normal,
                    },
                );
            }
        }
    }

    edges.extend(open.into_values().map(|edge| edge.segment));
    edges
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_layout() {
        let geometry = box_geometry(2.0, 2.0, 2.0);
        assert_eq!(geometry.vertex_count(), 24);
        assert_eq!(geometry.triangles.len(), 12);
        assert_eq!(geometry.normals.as_ref().map(Vec::len), Some(24));
        for p in &geometry.positions {
            assert!((p.x.abs() - 1.0).abs() < 1e-6);
            assert!((p.y.abs() - 1.0).abs() < 1e-6);
            assert!((p.z.abs() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_box_faces_point_outward() {
        let geometry = box_geometry(1.0, 2.0, 3.0);
        for (i, &[a, _, _]) in geometry.triangles.iter().enumerate() {
            let outward = geometry.positions[a].coords;
            assert!(geometry.face_normal(i).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn test_prism_faces_point_outward() {
        for sides in [3, 5, 6] {
            let geometry = prism_geometry(1.0, 0.3, sides);
            assert_eq!(geometry.triangles.len(), 2 * sides + 2 * sides);
            for i in 0..geometry.triangles.len() {
                let [a, b, c] = geometry.triangles[i];
                let centroid = (geometry.positions[a].coords
                    + geometry.positions[b].coords
                    + geometry.positions[c].coords)
                    / 3.0;
                assert!(geometry.face_normal(i).dot(&centroid) > 0.0);
            }
        }
    }

    #[test]
    fn test_box_outline_has_twelve_edges() {
        let edges = extract_edges(&box_geometry(1.0, 1.0, 1.0), 1.0);
        assert_eq!(edges.len(), 12);
        for [a, b] in &edges {
            // Face diagonals are never part of the outline
            assert!(((b - a).norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_prism_outline_edge_counts() {
        for sides in [3, 5, 6] {
            let edges = extract_edges(&prism_geometry(1.0, 0.5, sides), 1.0);
            assert_eq!(edges.len(), 3 * sides);
        }
    }

    #[test]
    fn test_open_mesh_keeps_boundary_edges() {
        let mut geometry = Geometry::new();
        geometry.push_quad(
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            Vector3::z(),
        );
        // Four borders; the shared diagonal is coplanar
        assert_eq!(extract_edges(&geometry, 1.0).len(), 4);
    }

    #[test]
    fn test_compute_vertex_normals_on_box() {
        let mut geometry = box_geometry(1.0, 1.0, 1.0);
        let original = geometry.normals.clone();
        geometry.normals = None;
        geometry.compute_vertex_normals();
        let normals = geometry.normals.as_ref().expect("normals computed");
        for (computed, expected) in normals.iter().zip(original.expect("box normals")) {
            assert!((computed - expected).norm() < 1e-5);
        }
    }
}
