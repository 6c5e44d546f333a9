//! Replay of recorded landmark streams.

use std::path::Path;

use tracing::{debug, info};

use handrig_data::{HandMessage, load_frames};

use crate::source::{CaptureError, LandmarkSource};

/// Plays back a fixed list of messages, optionally looping.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    messages: Vec<HandMessage>,
    cursor: usize,
    looping: bool,
    frame_rate: Option<f32>,
    active: bool,
}

impl ReplaySource {
    pub fn from_messages(messages: Vec<HandMessage>) -> Result<Self, CaptureError> {
        if messages.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(Self {
            messages,
            cursor: 0,
            looping: false,
            frame_rate: None,
            active: true,
        })
    }

    /// Load a JSON array or JSON-lines recording.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let messages = load_frames(path.as_ref())?;
        info!(
            path = %path.as_ref().display(),
            messages = messages.len(),
            "Opened landmark replay"
        );
        Self::from_messages(messages)
    }

    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_frame_rate(mut self, fps: f32) -> Self {
        self.frame_rate = Some(fps);
        self
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Index of the next message to be played.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
        self.active = true;
    }
}

impl LandmarkSource for ReplaySource {
    fn next_message(&mut self) -> Result<Option<HandMessage>, CaptureError> {
        if !self.active {
            return Ok(None);
        }
        if self.cursor >= self.messages.len() {
            if !self.looping {
                self.active = false;
                return Ok(None);
            }
            debug!("Replay looped");
            self.cursor = 0;
        }
        let message = self.messages[self.cursor].clone();
        self.cursor += 1;
        Ok(Some(message))
    }

    fn frame_rate(&self) -> Option<f32> {
        self.frame_rate
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handrig_data::Landmark;

    fn message(x: f32) -> HandMessage {
        HandMessage::new(vec![Landmark::new(x, 0.5, 0.0); 21])
    }

    #[test]
    fn test_plays_once_then_ends() {
        let mut source = ReplaySource::from_messages(vec![message(0.1), message(0.2)]).unwrap();
        assert_eq!(source.next_message().unwrap(), Some(message(0.1)));
        assert_eq!(source.next_message().unwrap(), Some(message(0.2)));
        assert_eq!(source.next_message().unwrap(), None);
        assert!(!source.is_active());
    }

    #[test]
    fn test_looping_wraps_around() {
        let mut source = ReplaySource::from_messages(vec![message(0.1), message(0.2)])
            .unwrap()
            .with_looping(true);
        for _ in 0..2 {
            source.next_message().unwrap();
        }
        assert_eq!(source.next_message().unwrap(), Some(message(0.1)));
        assert!(source.is_active());
        source.stop();
        assert_eq!(source.next_message().unwrap(), None);
    }

    #[test]
    fn test_empty_replay_is_rejected() {
        assert!(matches!(
            ReplaySource::from_messages(Vec::new()),
            Err(CaptureError::Empty)
        ));
    }

    #[test]
    fn test_from_path_reads_json_lines() {
        let line = serde_line(0.3);
        let path = std::env::temp_dir().join(format!("handrig-replay-{}.jsonl", std::process::id()));
        std::fs::write(&path, format!("{line}\n{line}\n")).unwrap();

        let mut source = ReplaySource::from_path(&path).unwrap();
        assert_eq!(source.len(), 2);
        let first = source.next_message().unwrap().unwrap();
        assert_eq!(first.hand_id.as_deref(), Some("right"));
        assert_eq!(first.landmarks.len(), 21);
        std::fs::remove_file(&path).ok();
    }

    fn serde_line(x: f32) -> String {
        let points: Vec<String> = (0..21).map(|_| format!("[{x}, 0.5, 0.0]")).collect();
        format!(r#"{{"hand_id": "right", "landmarks": [{}]}}"#, points.join(", "))
    }
}
