/// Wirescene Terminal - randomized wireframe shapes in the terminal
///
/// Controls:
///   - Mouse drag / Arrow Keys: Orbit the camera
///   - Scroll / +/-: Zoom
///   - Q/ESC: Quit
use clap::Parser;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::time::Duration;
use wirescene_core::{CooldownPolicy, SceneConfig, Variant};
use wirescene_terminal::{AppError, TerminalApp};

#[derive(Parser, Debug)]
#[command(version, about = "Randomized wireframe shapes in the terminal")]
struct Args {
    /// Viewer iteration: distorted-boxes, random-shapes or drifting-shapes
    #[arg(short, long, default_value_t = Variant::DriftingShapes)]
    variant: Variant,

    /// Seed for shape generation and rotation rates (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of shapes for the random variants
    #[arg(short, long, default_value_t = wirescene_core::config::SHAPE_COUNT)]
    count: usize,

    /// Delay before autorotation resumes after a drag
    #[arg(long, default_value_t = 1000)]
    cooldown_ms: u64,

    /// Behaviour when dragging again during the cooldown: cancel or uncancelable
    #[arg(long, default_value_t = CooldownPolicy::CancelOnReengage)]
    policy: CooldownPolicy,
}

fn main() -> Result<(), AppError> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(|| StdRng::from_os_rng().next_u64());
    let mut config = SceneConfig::for_variant(args.variant);
    config.shape_count = args.count;
    config.cooldown = Duration::from_millis(args.cooldown_ms);
    config.policy = args.policy;

    let mut app = TerminalApp::new(config, StdRng::seed_from_u64(seed), seed)?;
    app.run()?;

    println!("wirescene: seed {}", seed);
    Ok(())
}
