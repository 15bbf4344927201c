/// Camera, projection and orbit controls
use nalgebra::{Matrix4, Point3, Vector3};
use std::f32::consts::{PI, TAU};

use crate::config::CameraConfig;
use crate::transform::Transform;

/// Keeps the orbit away from the poles
const POLAR_EPSILON: f32 = 1e-6;

/// Perspective camera configuration for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: PI / 4.0, // 45 degrees
            aspect: aspect_ratio(width, height),
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        Self {
            position: config.position,
            fov: config.fov_degrees.to_radians(),
            ..Self::new(width, height)
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    /// Model-view-projection for an object placed by `model`
    pub fn mvp(&self, model: &Matrix4<f32>) -> Matrix4<f32> {
        Transform::mvp_matrix(model, &self.view_matrix(), &self.projection_matrix())
    }

    /// Project a 3D point to 2D screen space
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        project(&self.mvp(model_matrix), point, width, height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// Project through a precomputed model-view-projection matrix
///
/// Returns screen coordinates and normalized depth in `[-1, 1]`, or `None`
/// when the point is behind the camera or outside the depth range. Points
/// outside the viewport are still returned so lines can be clipped per pixel.
pub fn project(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Prevent division by near-zero depth values
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;
    if !(-1.0..=1.0).contains(&depth) {
        return None;
    }

    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}

/// Emitted when a drag gesture begins or ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    Start,
    End,
}

/// Orbits a camera around a target on a sphere, with damped motion
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    radius: f32,
    azimuth: f32,
    polar: f32,
    delta_azimuth: f32,
    delta_polar: f32,
    dragging: bool,
}

impl OrbitControls {
    pub fn new(position: Point3<f32>, target: Point3<f32>, damping_factor: f32) -> Self {
        let offset = position - target;
        let radius = offset.norm();
        let (azimuth, polar) = if radius > 0.0 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
            )
        } else {
            (0.0, PI / 2.0)
        };

        Self {
            target,
            damping_factor: damping_factor.clamp(0.0, 1.0),
            rotate_speed: 1.0,
            min_radius: 0.5,
            max_radius: 500.0,
            radius,
            azimuth,
            polar,
            delta_azimuth: 0.0,
            delta_polar: 0.0,
            dragging: false,
        }
    }

    pub fn for_camera(camera: &Camera, damping_factor: f32) -> Self {
        Self::new(camera.position, camera.target, damping_factor)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn polar(&self) -> f32 {
        self.polar
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Pointer pressed; reports `Start` unless a drag is already running
    pub fn begin_drag(&mut self) -> Option<ControlEvent> {
        if self.dragging {
            return None;
        }
        self.dragging = true;
        Some(ControlEvent::Start)
    }

    /// Pointer moved by `(dx, dy)` pixels in a viewport `viewport_height` tall
    pub fn drag(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if !self.dragging {
            return;
        }
        let height = viewport_height.max(1.0);
        self.nudge(
            -TAU * dx / height * self.rotate_speed,
            -TAU * dy / height * self.rotate_speed,
        );
    }

    /// Pointer released; reports `End` only for a running drag
    pub fn end_drag(&mut self) -> Option<ControlEvent> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        Some(ControlEvent::End)
    }

    /// Queue an orbit by angle deltas (radians)
    pub fn nudge(&mut self, azimuth: f32, polar: f32) {
        self.delta_azimuth += azimuth;
        self.delta_polar += polar;
    }

    /// Scale the orbit radius, `scale < 1` moves closer
    pub fn dolly(&mut self, scale: f32) {
        if scale > 0.0 {
            self.radius = (self.radius * scale).clamp(self.min_radius, self.max_radius);
        }
    }

    /// Advance one frame and return the new camera position
    pub fn update(&mut self) -> Point3<f32> {
        if self.damping_factor > 0.0 {
            self.azimuth += self.delta_azimuth * self.damping_factor;
            self.polar += self.delta_polar * self.damping_factor;
            self.delta_azimuth *= 1.0 - self.damping_factor;
            self.delta_polar *= 1.0 - self.damping_factor;
        } else {
            self.azimuth += self.delta_azimuth;
            self.polar += self.delta_polar;
            self.delta_azimuth = 0.0;
            self.delta_polar = 0.0;
        }
        self.polar = self.polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.position()
    }

    pub fn position(&self) -> Point3<f32> {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = self.azimuth.sin_cos();
        self.target
            + Vector3::new(
                self.radius * sin_polar * sin_azimuth,
                self.radius * cos_polar,
                self.radius * sin_polar * cos_azimuth,
            )
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.target = self.target;
    }
}
