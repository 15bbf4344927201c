/// Turns shape descriptors into wireframe drawables
use nalgebra::Matrix4;

use crate::color::Hsl;
use crate::config::EDGE_THRESHOLD_DEGREES;
use crate::geometry::{box_geometry, extract_edges, prism_geometry, Geometry, Segment};
use crate::shape::{ShapeDescriptor, ShapeKind};
use crate::transform::{RotationState, Transform};

/// Surface fill; always fully transparent in this viewer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub opacity: f32,
}

impl Material {
    pub const TRANSPARENT: Material = Material { opacity: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Hsl,
    pub width: f32,
}

/// A shape ready for display: faces stay invisible, only the edges are drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Drawable {
    pub id: usize,
    pub geometry: Geometry,
    pub edges: Vec<Segment>,
    pub material: Material,
    pub outline: Outline,
    pub model: Matrix4<f32>,
}

impl Drawable {
    /// Wrap an already built geometry with the descriptor's placement and outline
    pub fn from_geometry(shape: &ShapeDescriptor, geometry: Geometry) -> Self {
        let edges = extract_edges(&geometry, EDGE_THRESHOLD_DEGREES);
        Self {
            id: shape.id,
            geometry,
            edges,
            material: Material::TRANSPARENT,
            outline: Outline {
                color: shape.color,
                width: shape.outline_width,
            },
            model: Transform::model_matrix(&shape.position, &RotationState::from(shape.rotation)),
        }
    }

    pub fn is_visible_fill(&self) -> bool {
        self.material.opacity > 0.0
    }
}

/// Geometry for a descriptor: a cube of edge `size`, or a prism of radius
/// `size / 2` and the descriptor's height
pub fn shape_geometry(shape: &ShapeDescriptor) -> Geometry {
    match shape.kind.sides() {
        None => box_geometry(shape.size, shape.size, shape.size),
        Some(sides) => prism_geometry(shape.size / 2.0, shape.height(), sides),
    }
}

pub fn render_shape(shape: &ShapeDescriptor) -> Drawable {
    Drawable::from_geometry(shape, shape_geometry(shape))
}

impl ShapeKind {
    /// Outline segment count of an undistorted shape of this kind
    pub fn outline_edge_count(self) -> usize {
        match self.sides() {
            None => 12,
            Some(sides) => 3 * sides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::YELLOW;
    use nalgebra::{Point3, Vector3};

    fn descriptor(kind: ShapeKind) -> ShapeDescriptor {
        ShapeDescriptor {
            id: 7,
            kind,
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::zeros(),
            size: 2.0,
            color: YELLOW,
            outline_width: 2.5,
        }
    }

    #[test]
    fn test_fill_is_transparent() {
        let drawable = render_shape(&descriptor(ShapeKind::Cube));
        assert_eq!(drawable.material.opacity, 0.0);
        assert!(!drawable.is_visible_fill());
        assert_eq!(drawable.outline.color, YELLOW);
        assert_eq!(drawable.outline.width, 2.5);
        assert_eq!(drawable.id, 7);
    }

    #[test]
    fn test_cube_is_not_a_prism() {
        let drawable = render_shape(&descriptor(ShapeKind::Cube));
        assert_eq!(drawable.geometry.vertex_count(), 24);
        assert_eq!(drawable.edges.len(), 12);
    }

    #[test]
    fn test_prism_cross_sections() {
        for kind in [
            ShapeKind::TriangularPrism,
            ShapeKind::PentagonalPrism,
            ShapeKind::HexagonalPrism,
        ] {
            let drawable = render_shape(&descriptor(kind));
            let sides = kind.sides().expect("prism");
            assert_eq!(drawable.edges.len(), kind.outline_edge_count());
            let top_ring = drawable
                .edges
                .iter()
                .filter(|[a, b]| (a.y - 0.3).abs() < 1e-5 && (b.y - 0.3).abs() < 1e-5)
                .count();
            assert_eq!(top_ring, sides);
        }
    }

    #[test]
    fn test_prism_height_is_fraction_of_size() {
        let drawable = render_shape(&descriptor(ShapeKind::HexagonalPrism));
        let (min, max) = drawable
            .geometry
            .positions
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        assert!((max - min - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let shape = descriptor(ShapeKind::PentagonalPrism);
        assert_eq!(render_shape(&shape), render_shape(&shape));
    }

    #[test]
    fn test_model_places_shape() {
        let drawable = render_shape(&descriptor(ShapeKind::Cube));
        let center = drawable.model.transform_point(&Point3::origin());
        assert!((center - Point3::new(1.0, 2.0, 3.0)).norm() < 1e-6);
    }
}
