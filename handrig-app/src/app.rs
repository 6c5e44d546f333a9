use std::error::Error;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use handrig_capture::{ReplaySource, spawn_feeder, spawn_rig_load};
use handrig_pose::{HandModel, PoseConfig, RenderMode, TracingSink, load_config};

use crate::Args;

pub fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_target(false)
        .init();
}

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    if !(args.fps > 0.0) {
        return Err(format!("--fps must be positive, got {}", args.fps).into());
    }

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PoseConfig::default(),
    };
    config.force_procedural |= args.procedural;
    config.validate()?;

    let mut model = HandModel::new(config, Box::new(TracingSink));
    if let Some(rig) = &args.rig {
        info!(path = %rig.display(), "Loading rig in background");
        model.begin_loading(spawn_rig_load(rig));
    }

    let source = ReplaySource::from_path(&args.frames)?
        .with_looping(args.looping)
        .with_frame_rate(args.fps);
    let feeder = spawn_feeder(source, model.mailbox(), args.fps)?;

    let interval = Duration::from_secs_f32(1.0 / args.fps);
    let mut applied = 0u32;
    for tick in 0..args.ticks {
        let started = Instant::now();
        let report = model.tick();
        if report.applied_frame {
            applied += 1;
        }

        match report.mode {
            RenderMode::Rigged => {
                if let Some(retarget) = report.retarget {
                    debug!(
                        tick,
                        updated = retarget.updated,
                        jitter = retarget.jitter,
                        converging = retarget.converging,
                        degenerate = retarget.degenerate,
                        "Retargeted"
                    );
                }
            }
            RenderMode::Procedural => {
                if report.mesh_rebuilt {
                    let vertices = model.meshes().map_or(0, |m| m.vertex_count());
                    debug!(tick, vertices, "Rebuilt mesh");
                }
            }
            RenderMode::Inactive => break,
        }

        if feeder.is_finished() && !model.mailbox().has_pending() {
            info!(tick, "Recording exhausted");
            break;
        }
        if let Some(remaining) = interval.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    let feeder_stats = feeder.stop();
    let mailbox = model.mailbox().stats();
    let camera = model.camera();
    info!(
        state = ?model.rig_state(),
        applied,
        posted = feeder_stats.posted,
        rejected = feeder_stats.rejected,
        overwritten = mailbox.overwritten,
        "Run finished"
    );
    info!(
        position = ?camera.position,
        center = ?camera.center,
        "Final camera"
    );
    match model.scene_points() {
        Some(points) => info!(wrist = ?points[0], "Final wrist position"),
        None => warn!("No landmark frame was applied"),
    }

    model.dispose();
    Ok(())
}
