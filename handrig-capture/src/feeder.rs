//! Transport thread feeding a landmark source into the frame mailbox.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use handrig_pose::FrameMailbox;

use crate::source::{CaptureError, LandmarkSource};

const DEFAULT_FPS: f32 = 30.0;

/// Totals reported when the feeder thread exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeederStats {
    pub posted: u64,
    pub rejected: u64,
}

/// Owns the feeder thread. Dropping the handle stops it.
#[derive(Debug)]
pub struct FeederHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<FeederStats>>,
}

impl FeederHandle {
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().is_none_or(|t| t.is_finished())
    }

    /// Signal the thread to stop and wait for it.
    pub fn stop(mut self) -> FeederStats {
        self.shutdown()
    }

    fn shutdown(&mut self) -> FeederStats {
        self.stop.store(true, Ordering::Relaxed);
        match self.thread.take().map(JoinHandle::join) {
            Some(Ok(stats)) => stats,
            Some(Err(_)) => {
                warn!("Feeder thread panicked");
                FeederStats::default()
            }
            None => FeederStats::default(),
        }
    }
}

impl Drop for FeederHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Post messages from `source` into `mailbox` at `fps` until the source ends
/// or the handle is stopped. A non-positive `fps` falls back to the source's
/// own rate, then to 30.
pub fn spawn_feeder<S>(
    mut source: S,
    mailbox: FrameMailbox,
    fps: f32,
) -> Result<FeederHandle, CaptureError>
where
    S: LandmarkSource + 'static,
{
    let fps = if fps > 0.0 {
        fps
    } else {
        source.frame_rate().filter(|r| *r > 0.0).unwrap_or(DEFAULT_FPS)
    };
    let interval = Duration::from_secs_f32(1.0 / fps);
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let thread = thread::Builder::new()
        .name("handrig-feeder".to_string())
        .spawn(move || {
            let mut stats = FeederStats::default();
            while !stop_flag.load(Ordering::Relaxed) && source.is_active() {
                match source.next_message() {
                    Ok(Some(message)) => match mailbox.post(message.landmarks) {
                        Ok(()) => stats.posted += 1,
                        Err(err) => {
                            debug!(%err, "Feeder posted malformed frame");
                            stats.rejected += 1;
                        }
                    },
                    Ok(None) => break,
                    Err(err) => {
                        warn!(%err, "Landmark source failed");
                        break;
                    }
                }
                thread::sleep(interval);
            }
            source.stop();
            info!(posted = stats.posted, rejected = stats.rejected, "Feeder stopped");
            stats
        })
        .map_err(CaptureError::Spawn)?;

    Ok(FeederHandle {
        stop,
        thread: Some(thread),
    })
}
