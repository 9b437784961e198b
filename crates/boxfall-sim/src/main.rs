use std::path::PathBuf;

use anyhow::{Context, Result};
use boxfall_engine::SceneDesc;
use boxfall_sim::{snapshot, GameRunner, SceneGame};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a boxfall scene headless and print where everything lands", long_about = None)]
struct Args {
    /// Scene file (JSON)
    scene: PathBuf,

    /// Number of frames to run
    #[arg(long, default_value = "600")]
    frames: u32,

    /// Host frame time in seconds
    #[arg(long, default_value = "0.016666668")]
    frame_dt: f32,

    /// Log the moved entities every N frames (0 disables)
    #[arg(long, default_value = "0")]
    report_every: u32,

    /// Print final positions as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let text = std::fs::read_to_string(&args.scene)
        .with_context(|| format!("failed to read scene {}", args.scene.display()))?;
    let desc = SceneDesc::from_json(&text)
        .with_context(|| format!("failed to parse scene {}", args.scene.display()))?;

    let mut runner = GameRunner::new(SceneGame::new(desc)).context("invalid scene configuration")?;
    runner.init().context("failed to populate scene")?;

    for frame in 1..=args.frames {
        runner.tick(args.frame_dt);
        if args.report_every > 0 && frame % args.report_every == 0 {
            log::info!(
                "frame {frame}: {} moved, {} contacts",
                runner.moved().len(),
                runner.context().collisions().len()
            );
        }
    }

    log::info!("ran {} frames, {} physics steps", runner.frames(), runner.steps());

    let report = snapshot(runner.context());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for row in &report {
            println!("{row}");
        }
    }

    Ok(())
}
