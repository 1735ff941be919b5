#![deny(clippy::all, clippy::pedantic)]

//! # Simulation Runtime
//!
//! Headless entry point: loads a scene (or the built-in drop scene), steps
//! the physics system and logs progress. Set `RUST_LOG=physics=trace` to see
//! per-contact output.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use runtime::app::{self, RunOptions};
use runtime::scene::{Scene, BUILTIN_SCENE};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sim_runtime", about = "Step a physics scene headlessly")]
struct Args {
    /// Scene JSON file; the built-in drop scene when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,
    #[arg(long, default_value_t = 600)]
    steps: u64,
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Frames between progress lines; 0 disables them.
    #[arg(long, default_value_t = 60)]
    log_every: u64,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::from_json(BUILTIN_SCENE)?,
    };

    let summary = app::run(
        &scene,
        RunOptions { steps: args.steps, dt: args.dt, log_every: args.log_every },
    )?;
    for (name, position) in &summary.positions {
        tracing::info!("{name}: {position:?}");
    }
    Ok(())
}
