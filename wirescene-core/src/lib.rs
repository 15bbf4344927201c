//! Wirescene Core Library - randomized wireframe scenes
//!
//! Shape generation, geometry and outline extraction, the one-shot vertex
//! jitter, camera/orbit math and the autorotation controller. Nothing in here
//! touches a terminal, a canvas or a real clock.

pub mod color;
pub mod config;
pub mod controller;
pub mod distort;
pub mod geometry;
pub mod projection;
pub mod render;
pub mod scene;
pub mod shape;
pub mod timer;
pub mod transform;

// Re-export commonly used types
pub use color::{Hsl, Rgb};
pub use config::{ConfigError, CooldownPolicy, SceneConfig, Variant};
pub use controller::{AutoRotate, AutoRotateController, InteractionState};
pub use distort::distort;
pub use geometry::{Geometry, Segment};
pub use projection::{Camera, ControlEvent, OrbitControls};
pub use render::{render_shape, Drawable};
pub use scene::Scene;
pub use shape::{generate_shapes, ShapeDescriptor, ShapeKind};
pub use transform::{RotationState, Transform};
