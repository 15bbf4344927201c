/// Randomized shape descriptors
use nalgebra::Vector3;
use rand::Rng;

use crate::color::Hsl;
use crate::config::{ShapeRanges, Span, PRISM_HEIGHT_RATIO};

/// Kinds of solid the viewer can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Cube,
    TriangularPrism,
    PentagonalPrism,
    HexagonalPrism,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Cube,
        ShapeKind::TriangularPrism,
        ShapeKind::PentagonalPrism,
        ShapeKind::HexagonalPrism,
    ];

    /// Cross-section side count, `None` for the cube
    pub fn sides(self) -> Option<usize> {
        match self {
            ShapeKind::Cube => None,
            ShapeKind::TriangularPrism => Some(3),
            ShapeKind::PentagonalPrism => Some(5),
            ShapeKind::HexagonalPrism => Some(6),
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Placement and appearance of one shape, fixed once generated
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeDescriptor {
    pub id: usize,
    pub kind: ShapeKind,
    pub position: Vector3<f32>,
    /// Euler angles in radians
    pub rotation: Vector3<f32>,
    pub size: f32,
    pub color: Hsl,
    pub outline_width: f32,
}

impl ShapeDescriptor {
    /// Height of the prism along its axis; cubes are `size` tall
    pub fn height(&self) -> f32 {
        match self.kind {
            ShapeKind::Cube => self.size,
            _ => self.size * PRISM_HEIGHT_RATIO,
        }
    }
}

fn random_vector<R: Rng + ?Sized>(span: &Span, rng: &mut R) -> Vector3<f32> {
    Vector3::new(span.sample(rng), span.sample(rng), span.sample(rng))
}

/// Generate `count` independent descriptors with ids `0..count`
pub fn generate_shapes<R: Rng + ?Sized>(
    count: usize,
    ranges: &ShapeRanges,
    rng: &mut R,
) -> Vec<ShapeDescriptor> {
    (0..count)
        .map(|id| ShapeDescriptor {
            id,
            kind: ShapeKind::random(rng),
            position: random_vector(&ranges.position, rng),
            rotation: random_vector(&ranges.rotation, rng),
            size: ranges.size.sample(rng),
            color: Hsl::random(ranges, rng),
            outline_width: ranges.outline_width.sample(rng),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_contiguous() {
        let mut rng = StdRng::seed_from_u64(1);
        let shapes = generate_shapes(50, &ShapeRanges::default(), &mut rng);
        assert_eq!(shapes.len(), 50);
        for (index, shape) in shapes.iter().enumerate() {
            assert_eq!(shape.id, index);
        }
    }

    #[test]
    fn test_fields_within_ranges() {
        let ranges = ShapeRanges::default();
        let mut rng = StdRng::seed_from_u64(2);
        for shape in generate_shapes(500, &ranges, &mut rng) {
            assert!(ranges.size.contains(shape.size));
            assert!(shape.size >= 0.5 && shape.size <= 3.0);
            assert!(shape.color.h >= 0.0 && shape.color.h < 360.0);
            assert!(ranges.saturation.contains(shape.color.s));
            assert!(ranges.lightness.contains(shape.color.l));
            assert!(ranges.outline_width.contains(shape.outline_width));
            assert!(shape.position.iter().all(|&c| ranges.position.contains(c)));
            assert!(shape.rotation.iter().all(|&c| ranges.rotation.contains(c)));
        }
    }

    #[test]
    fn test_every_kind_appears() {
        let mut rng = StdRng::seed_from_u64(5);
        let kinds: HashSet<ShapeKind> = generate_shapes(200, &ShapeRanges::default(), &mut rng)
            .into_iter()
            .map(|s| s.kind)
            .collect();
        assert_eq!(kinds.len(), ShapeKind::ALL.len());
    }

    #[test]
    fn test_side_counts() {
        assert_eq!(ShapeKind::Cube.sides(), None);
        assert_eq!(ShapeKind::TriangularPrism.sides(), Some(3));
        assert_eq!(ShapeKind::PentagonalPrism.sides(), Some(5));
        assert_eq!(ShapeKind::HexagonalPrism.sides(), Some(6));
    }

    #[test]
    fn test_prism_height_ratio() {
        let shape = ShapeDescriptor {
            id: 0,
            kind: ShapeKind::PentagonalPrism,
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
            size: 2.0,
            color: crate::color::RED,
            outline_width: 1.0,
        };
        assert!((shape.height() - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let ranges = ShapeRanges::default();
        let a = generate_shapes(10, &ranges, &mut StdRng::seed_from_u64(11));
        let b = generate_shapes(10, &ranges, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}
