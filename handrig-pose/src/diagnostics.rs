//! Structured diagnostics emitted by the update pass.
//!
//! The core never logs directly for recoverable conditions; it emits a
//! [`Diagnostic`] to a sink and carries on. Sinks must not block.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use handrig_data::FrameError;

use crate::retarget::RigState;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// One or more frames were dropped since the last tick. `error` is the latest.
    MalformedFrame { error: FrameError, dropped: u64 },
    /// A joint update was skipped because its landmark pair nearly coincides.
    DegenerateDirection { joint: &'static str },
    /// No bone matched this joint. Reported once, at binding time.
    UnresolvedBinding { joint: &'static str },
    BindingResolved {
        joint: &'static str,
        bone: String,
        exact: bool,
    },
    AssetLoadFailure { reason: String },
    InvalidPointCount { expected: usize, actual: usize },
    RigStateChanged { from: RigState, to: RigState },
}

pub trait DiagnosticSink: Send {
    fn emit(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::MalformedFrame { error, dropped } => {
                warn!(%error, dropped, "Dropped malformed landmark frame");
            }
            Diagnostic::DegenerateDirection { joint } => {
                debug!(joint, "Skipped degenerate bone direction");
            }
            Diagnostic::UnresolvedBinding { joint } => {
                warn!(joint, "No bone found for joint; it will stay at rest");
            }
            Diagnostic::BindingResolved { joint, bone, exact } => {
                debug!(joint, %bone, exact, "Bound joint");
            }
            Diagnostic::AssetLoadFailure { reason } => {
                warn!(%reason, "Rig failed to load, falling back to procedural mesh");
            }
            Diagnostic::InvalidPointCount { expected, actual } => {
                warn!(expected, actual, "Skipped mesh synthesis");
            }
            Diagnostic::RigStateChanged { from, to } => {
                info!(?from, ?to, "Rig state changed");
            }
        }
    }
}

/// Sends diagnostics over an unbounded channel. Disconnected receivers are ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<Diagnostic>,
}

impl ChannelSink {
    pub fn new(sender: Sender<Diagnostic>) -> Self {
        Self { sender }
    }
}

impl DiagnosticSink for ChannelSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        let _ = self.sender.send(diagnostic);
    }
}

/// Collects diagnostics in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<Diagnostic>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(
            &mut *self
                .records
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_clones_share_buffer() {
        let sink = RecordingSink::new();
        let mut writer = sink.clone();
        writer.emit(Diagnostic::DegenerateDirection { joint: "index2" });
        assert_eq!(sink.snapshot().len(), 1);
        assert_eq!(sink.drain().len(), 1);
        assert!(sink.snapshot().is_empty());
    }

    #[test]
    fn test_channel_sink_ignores_dropped_receiver() {
        let (sender, receiver) = std::sync::mpsc::channel();
        let mut sink = ChannelSink::new(sender);
        sink.emit(Diagnostic::UnresolvedBinding { joint: "ring2" });
        assert_eq!(
            receiver.recv().unwrap(),
            Diagnostic::UnresolvedBinding { joint: "ring2" }
        );
        drop(receiver);
        sink.emit(Diagnostic::UnresolvedBinding { joint: "ring3" });
    }
}
