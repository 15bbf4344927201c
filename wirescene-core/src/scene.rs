/// Composition root: generated shapes, their drawables and the autorotating group
use nalgebra::Matrix4;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{ConfigError, SceneConfig, Variant};
use crate::controller::{AutoRotate, AutoRotateController, InteractionState};
use crate::distort::distort;
use crate::geometry::box_geometry;
use crate::render::{render_shape, Drawable};
use crate::shape::{generate_shapes, ShapeDescriptor, ShapeKind};
use crate::transform::{RotationState, Transform};

/// One live scene
///
/// Shapes are generated (and, for the first variant, distorted) once in
/// [`Scene::new`]. Frames and drag events only ever touch the group rotation.
pub struct Scene<R: Rng> {
    config: SceneConfig,
    shapes: Arc<[ShapeDescriptor]>,
    drawables: Vec<Drawable>,
    controller: AutoRotateController,
    group: Matrix4<f32>,
    frames: u64,
    rng: R,
}

impl<R: Rng> Scene<R> {
    pub fn new(config: SceneConfig, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let (shapes, drawables) = match config.variant {
            Variant::DistortedBoxes => build_distorted_boxes(&config, &mut rng),
            Variant::RandomShapes | Variant::DriftingShapes => {
                let shapes = generate_shapes(config.shape_count, &config.ranges, &mut rng);
                let drawables = shapes.iter().map(render_shape).collect();
                (shapes, drawables)
            }
        };

        let mode = match config.variant {
            Variant::DistortedBoxes => AutoRotate::Off,
            Variant::RandomShapes => AutoRotate::Fixed(config.fixed_rate),
            Variant::DriftingShapes => AutoRotate::Randomized {
                bound: config.rate_bound,
            },
        };
        let mut controller = AutoRotateController::new(mode, config.cooldown, config.policy);
        controller.resample_rate(&mut rng);

        log::info!(
            "built {} scene with {} shapes ({} outline segments)",
            config.variant,
            shapes.len(),
            drawables.iter().map(|d: &Drawable| d.edges.len()).sum::<usize>()
        );

        Ok(Self {
            config,
            shapes: shapes.into(),
            drawables,
            controller,
            group: Matrix4::identity(),
            frames: 0,
            rng,
        })
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// The descriptor set; the same allocation for the lifetime of the scene
    pub fn shapes(&self) -> &Arc<[ShapeDescriptor]> {
        &self.shapes
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn state(&self) -> InteractionState {
        self.controller.state()
    }

    pub fn controller(&self) -> &AutoRotateController {
        &self.controller
    }

    pub fn group_rotation(&self) -> RotationState {
        self.controller.rotation()
    }

    /// Group transform written by the last frame
    pub fn group_matrix(&self) -> &Matrix4<f32> {
        &self.group
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn drag_start(&mut self, now: Duration) {
        self.controller.drag_start(now);
    }

    pub fn drag_end(&mut self, now: Duration) {
        self.controller.drag_end(now);
    }

    /// Advance one rendered frame
    pub fn frame(&mut self, now: Duration) -> &Matrix4<f32> {
        let rotation = self.controller.frame(now, &mut self.rng);
        self.group = Transform::rotation_matrix(&rotation);
        self.frames += 1;
        &self.group
    }
}

fn build_distorted_boxes<R: Rng + ?Sized>(
    config: &SceneConfig,
    rng: &mut R,
) -> (Vec<ShapeDescriptor>, Vec<Drawable>) {
    config
        .boxes
        .iter()
        .enumerate()
        .map(|(id, jittered)| {
            let shape = ShapeDescriptor {
                id,
                kind: ShapeKind::Cube,
                position: nalgebra::Vector3::zeros(),
                rotation: nalgebra::Vector3::zeros(),
                size: jittered.size,
                color: jittered.color,
                outline_width: 1.0,
            };
            let edge = jittered.size;
            let geometry = distort(box_geometry(edge, edge, edge), jittered.offset, rng);
            let drawable = Drawable::from_geometry(&shape, geometry);
            (shape, drawable)
        })
        .unzip()
}
