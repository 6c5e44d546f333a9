//! Handrig Application
//!
//! Headless driver for the hand pose pipeline.
//!
//! Features:
//! - Replays recorded landmark frames through the transport feeder
//! - Loads a rig asset in the background and falls back to the procedural mesh
//! - Reports pose, mesh and camera state per tick

mod app;

use clap::Parser;
use std::path::PathBuf;

/// Handrig - hand landmark pose driver
#[derive(Parser, Debug)]
#[command(name = "handrig")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Landmark recording (JSON array or JSON lines)
    #[arg(short, long)]
    frames: PathBuf,

    /// Rig asset to drive (JSON)
    #[arg(short, long)]
    rig: Option<PathBuf>,

    /// Pose configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of update ticks to run
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,

    /// Tick and replay rate in frames per second
    #[arg(long, default_value_t = 30.0)]
    fps: f32,

    /// Ignore the rig and always render the procedural mesh
    #[arg(long)]
    procedural: bool,

    /// Replay the recording in a loop
    #[arg(long)]
    looping: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    app::init_tracing(&args.log_level);

    if let Err(e) = app::run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
