/// Wirescene Web - canvas front end compiled to WASM
///
/// The page owns the animation loop: it calls `frame` from
/// `requestAnimationFrame` and forwards pointer events with their timestamps.
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};
use wirescene_core::projection::project;
use wirescene_core::{
    Camera, ControlEvent, InteractionState, OrbitControls, Scene, SceneConfig, Variant,
};

#[wasm_bindgen]
pub struct WebScene {
    scene: Scene<StdRng>,
    camera: Camera,
    controls: OrbitControls,
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    last_pointer: Option<(f32, f32)>,
}

/// Milliseconds from `performance.now()` as scene time
fn scene_time(now_ms: f64) -> Duration {
    Duration::from_secs_f64(now_ms.max(0.0) / 1000.0)
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
impl WebScene {
    /// Attach to the canvas with the given element id
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, variant: &str, seed: u32) -> Result<WebScene, JsValue> {
        let variant: Variant = variant.parse().map_err(to_js)?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let scene = Scene::new(
            SceneConfig::for_variant(variant),
            StdRng::seed_from_u64(u64::from(seed)),
        )
        .map_err(to_js)?;
        let camera = Camera::from_config(&scene.config().camera, canvas.width(), canvas.height());
        let controls = OrbitControls::for_camera(&camera, scene.config().damping_factor);

        Ok(WebScene {
            scene,
            camera,
            controls,
            canvas,
            context,
            last_pointer: None,
        })
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, now_ms: f64) {
        self.last_pointer = Some((x, y));
        if self.controls.begin_drag() == Some(ControlEvent::Start) {
            self.scene.drag_start(scene_time(now_ms));
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if let Some((last_x, last_y)) = self.last_pointer {
            self.controls
                .drag(x - last_x, y - last_y, self.canvas.height() as f32);
            self.last_pointer = Some((x, y));
        }
    }

    pub fn pointer_up(&mut self, now_ms: f64) {
        self.last_pointer = None;
        if self.controls.end_drag() == Some(ControlEvent::End) {
            self.scene.drag_end(scene_time(now_ms));
        }
    }

    pub fn zoom(&mut self, scale: f32) {
        self.controls.dolly(scale);
    }

    /// Match the drawing buffer to the canvas' displayed size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.camera.set_viewport(width, height);
    }

    pub fn interacting(&self) -> bool {
        self.scene.state() == InteractionState::Interacting
    }

    pub fn shape_count(&self) -> usize {
        self.scene.shapes().len()
    }

    /// Advance one frame and redraw every outline
    pub fn frame(&mut self, now_ms: f64) {
        self.controls.update();
        self.controls.apply(&mut self.camera);
        let group = *self.scene.frame(scene_time(now_ms));

        let (width, height) = (self.canvas.width(), self.canvas.height());
        self.context
            .clear_rect(0.0, 0.0, f64::from(width), f64::from(height));

        for drawable in self.scene.drawables() {
            let mvp = self.camera.mvp(&(group * drawable.model));
            self.context
                .set_stroke_style(&JsValue::from_str(&drawable.outline.color.css()));
            self.context.set_line_width(f64::from(drawable.outline.width));
            self.context.begin_path();
            for [a, b] in &drawable.edges {
                if let (Some(start), Some(end)) =
                    (project(&mvp, a, width, height), project(&mvp, b, width, height))
                {
                    self.context.move_to(f64::from(start.0), f64::from(start.1));
                    self.context.line_to(f64::from(end.0), f64::from(end.1));
                }
            }
            self.context.stroke();
        }
    }
}
