//! Play/pause demo progress bar.

use serde::{Deserialize, Serialize};

/// Progress added per tick while playing
pub const DEMO_STEP: u8 = 2;

/// Demo playback state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DemoPlayback {
    pub playing: bool,
    /// Progress percentage (0-100)
    pub progress: u8,
}

impl DemoPlayback {
    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn toggle(&mut self) {
        self.playing = !self.playing;
    }

    /// Stop and rewind to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance one tick. Reaching 100 pauses playback.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }
        if self.progress >= 100 {
            self.progress = 100;
            self.playing = false;
            return;
        }
        self.progress = (self.progress + DEMO_STEP).min(100);
    }

    pub fn is_finished(&self) -> bool {
        self.progress >= 100
    }
}
