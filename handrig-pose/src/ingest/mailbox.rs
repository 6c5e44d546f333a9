use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use handrig_data::{FrameError, Landmark, LandmarkFrame};

/// Counters kept by the mailbox over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailboxStats {
    /// Valid frames stored.
    pub posted: u64,
    /// Valid frames replaced by a newer one before the update pass saw them.
    pub overwritten: u64,
    /// Frames refused at post time.
    pub rejected: u64,
    /// Frames handed to the update pass.
    pub consumed: u64,
}

/// What the update pass receives when it empties the mailbox.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Delivery {
    pub frame: Option<LandmarkFrame>,
    /// Frames rejected since the previous take.
    pub rejected: u64,
    /// Most recent rejection reason since the previous take.
    pub last_error: Option<FrameError>,
}

impl Delivery {
    pub fn is_empty(&self) -> bool {
        self.frame.is_none() && self.rejected == 0
    }
}

#[derive(Debug, Default)]
struct Slot {
    pending: Option<LandmarkFrame>,
    rejected_since_take: u64,
    last_error: Option<FrameError>,
    stats: MailboxStats,
}

/// Single-slot, last-writer-wins frame handoff.
///
/// The transport posts whenever a frame arrives; the update pass takes at
/// most one frame per tick. Frames are validated on post, so a malformed
/// frame never displaces a valid pending one.
#[derive(Debug, Clone, Default)]
pub struct FrameMailbox {
    slot: Arc<Mutex<Slot>>,
}

impl FrameMailbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, landmarks: Vec<Landmark>) -> Result<(), FrameError> {
        let result = LandmarkFrame::new(landmarks);
        let mut slot = self.lock();
        match result {
            Ok(frame) => {
                if slot.pending.replace(frame).is_some() {
                    slot.stats.overwritten += 1;
                }
                slot.stats.posted += 1;
                trace!(posted = slot.stats.posted, "Frame posted");
                Ok(())
            }
            Err(err) => {
                slot.stats.rejected += 1;
                slot.rejected_since_take += 1;
                slot.last_error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Read and clear the slot.
    pub fn take(&self) -> Delivery {
        let mut slot = self.lock();
        let frame = slot.pending.take();
        if frame.is_some() {
            slot.stats.consumed += 1;
        }
        Delivery {
            frame,
            rejected: std::mem::take(&mut slot.rejected_since_take),
            last_error: slot.last_error.take(),
        }
    }

    pub fn has_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    pub fn stats(&self) -> MailboxStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
