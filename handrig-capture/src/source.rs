//! Common landmark source types and traits.

use thiserror::Error;

use handrig_data::{DecodeError, HandMessage};

/// Errors that can occur while reading landmarks.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Failed to decode landmarks: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to start capture thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Source contains no messages")]
    Empty,
}

/// Trait for anything that produces hand landmark messages.
pub trait LandmarkSource: Send {
    /// Get the next message, or `None` once the source is exhausted.
    fn next_message(&mut self) -> Result<Option<HandMessage>, CaptureError>;

    /// Native message rate, if known.
    fn frame_rate(&self) -> Option<f32>;

    /// Check if the source is still active.
    fn is_active(&self) -> bool;

    /// Stop producing messages.
    fn stop(&mut self);
}
