/// Terminal front end: crossterm event loop around a wirescene `Scene`
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use rand::rngs::StdRng;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use wirescene_core::{
    Camera, ConfigError, ControlEvent, InteractionState, OrbitControls, Scene, SceneConfig,
};

pub mod renderer;

pub use renderer::LineRenderer;
use renderer::CELL_ASPECT;

/// Radians per arrow-key press
const KEY_ORBIT_STEP: f32 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("invalid scene configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    scene: Scene<StdRng>,
    camera: Camera,
    controls: OrbitControls,
    renderer: LineRenderer,
    seed: u64,
    running: bool,
    started: Instant,
    last_mouse: Option<(u16, u16)>,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: SceneConfig, rng: StdRng, seed: u64) -> Result<Self, AppError> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, rng, seed, width, height)
    }

    /// Build the app for a given terminal size without touching the terminal
    pub fn with_size(
        config: SceneConfig,
        rng: StdRng,
        seed: u64,
        width: u16,
        height: u16,
    ) -> Result<Self, AppError> {
        let scene = Scene::new(config, rng)?;
        let mut camera = Camera::from_config(&scene.config().camera, 1, 1);
        camera.aspect = cell_aspect(width, height);
        let controls = OrbitControls::for_camera(&camera, scene.config().damping_factor);
        log::info!("terminal viewer {}x{} (seed {})", width, height, seed);

        Ok(Self {
            scene,
            camera,
            controls,
            renderer: LineRenderer::new(width as usize, height as usize),
            seed,
            running: true,
            started: Instant::now(),
            last_mouse: None,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn scene(&self) -> &Scene<StdRng> {
        &self.scene
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> Result<(), AppError> {
        terminal::enable_raw_mode()?;
        if let Err(err) = enter_screen(&mut stdout()) {
            // Partial setup still has to be undone
            let _ = leave_screen(&mut stdout());
            terminal::disable_raw_mode()?;
            return Err(err.into());
        }

        let result = self.main_loop();

        // Cleanup
        let restored = leave_screen(&mut stdout());
        terminal::disable_raw_mode()?;
        result.and(restored.map_err(AppError::from))
    }

    fn main_loop(&mut self) -> Result<(), AppError> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            // Handle every pending input event
            while event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event, self.started.elapsed());
            }

            self.update(self.started.elapsed());
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one input event at scene time `now`
    pub fn handle_event(&mut self, event: Event, now: Duration) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse, now),
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.camera.aspect = cell_aspect(width, height);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Left => self.controls.nudge(KEY_ORBIT_STEP, 0.0),
            KeyCode::Right => self.controls.nudge(-KEY_ORBIT_STEP, 0.0),
            KeyCode::Up => self.controls.nudge(0.0, KEY_ORBIT_STEP),
            KeyCode::Down => self.controls.nudge(0.0, -KEY_ORBIT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.controls.dolly(0.9),
            KeyCode::Char('-') => self.controls.dolly(1.0 / 0.9),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Duration) {
        let position = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.last_mouse = Some(position);
                if self.controls.begin_drag() == Some(ControlEvent::Start) {
                    self.scene.drag_start(now);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((x, y)) = self.last_mouse {
                    let dx = f32::from(mouse.column) - f32::from(x);
                    let dy = (f32::from(mouse.row) - f32::from(y)) * CELL_ASPECT;
                    let height = self.renderer.height() as f32 * CELL_ASPECT;
                    self.controls.drag(dx, dy, height);
                }
                self.last_mouse = Some(position);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.last_mouse = None;
                if self.controls.end_drag() == Some(ControlEvent::End) {
                    self.scene.drag_end(now);
                }
            }
            MouseEventKind::ScrollUp => self.controls.dolly(0.9),
            MouseEventKind::ScrollDown => self.controls.dolly(1.0 / 0.9),
            _ => {}
        }
    }

    /// Advance camera damping and the scene by one frame
    pub fn update(&mut self, now: Duration) {
        self.controls.update();
        self.controls.apply(&mut self.camera);
        self.scene.frame(now);
    }

    /// One-line summary drawn over the top row
    pub fn status_line(&self) -> String {
        let state = match self.scene.state() {
            InteractionState::Idle => "idle",
            InteractionState::Interacting => "interacting",
        };
        format!(
            "{} | seed {} | {} | cooldown: {} | FPS: {:.1} | drag=orbit arrows=orbit +/-=zoom q=quit",
            self.scene.config().variant,
            self.seed,
            state,
            self.scene.controller().policy(),
            self.fps
        )
    }

    fn render(&mut self) -> io::Result<()> {
        self.rasterize();

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()
    }

    /// Draw the current scene into the character buffer
    pub fn rasterize(&mut self) -> &LineRenderer {
        self.renderer.clear();
        let group = *self.scene.group_matrix();
        for drawable in self.scene.drawables() {
            self.renderer
                .render_drawable(drawable, &group, &self.camera);
        }
        &self.renderer
    }
}

fn enter_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(
        out,
        terminal::EnterAlternateScreen,
        EnableMouseCapture,
        cursor::Hide
    )
}

fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(
        out,
        DisableMouseCapture,
        terminal::LeaveAlternateScreen,
        cursor::Show
    )
}

/// Camera aspect ratio of a terminal, correcting for tall cells
fn cell_aspect(width: u16, height: u16) -> f32 {
    f32::from(width.max(1)) / (f32::from(height.max(1)) * CELL_ASPECT)
}
