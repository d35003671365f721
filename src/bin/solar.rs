use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use toy_orrery::config::SceneConfig;
use toy_orrery::frame_loop::{FrameLoop, Headless};
use toy_orrery::gui::WindowPlatform;

#[derive(Debug, Parser)]
#[command(name = "solar", about = "A toy solar system")]
struct Args {
    /// RON scene description. Without one, the built-in solar system is used.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Seed for the meteor belt and star field.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of background stars.
    #[arg(long)]
    stars: Option<usize>,

    /// Run this many frames without a window, then print where every body
    /// ended up.
    #[arg(long)]
    frames: Option<u64>,

    /// Print the scene description, with overrides applied, and exit.
    #[arg(long)]
    dump_scene: bool,

    /// Log filter (error, warn, info, debug, trace). RUST_LOG wins if set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let mut config = match &args.scene {
        Some(path) => {
            info!(path = %path.display(), "loading scene");
            SceneConfig::load(path)?
        }
        None => SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(stars) = args.stars {
        config.stars.count = stars;
    }

    if args.dump_scene {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let mut scene = config.build()?;
    let mut frame_loop = FrameLoop::new(config.window.ticks_per_frame);

    match args.frames {
        Some(frames) => {
            if frames > 0 {
                frame_loop.run(&mut scene, &mut Headless::new(frames))?;
            }
            for (name, position) in scene.orrery().world_positions() {
                println!("{:<10} {:>9.3} {:>9.3}", name, position.x, position.y);
            }
        }
        None => {
            let mut platform = WindowPlatform::new(&config.window);
            frame_loop.run(&mut scene, &mut platform)?;
        }
    }
    Ok(())
}
