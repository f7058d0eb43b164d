#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Transport tuning.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Seconds between time-update notifications while playing
    pub update_interval: f64,
    /// Capacity of the control queue to the audio thread
    pub message_capacity: usize,
    /// Volume before the first `set_volume` call
    pub initial_volume: f32,
    /// Fixed gain applied after the voice mix so stacked voices stay below full scale
    pub headroom: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            update_interval: 0.1,
            message_capacity: 1024,
            initial_volume: 0.7,
            headroom: 0.25,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_interval(mut self, seconds: f64) -> Self {
        if seconds.is_finite() {
            self.update_interval = seconds.max(0.0);
        }
        self
    }

    pub fn message_capacity(mut self, capacity: usize) -> Self {
        self.message_capacity = capacity.max(16);
        self
    }

    pub fn initial_volume(mut self, volume: f32) -> Self {
        if !volume.is_nan() {
            self.initial_volume = volume.clamp(0.0, 1.0);
        }
        self
    }

    pub fn headroom(mut self, headroom: f32) -> Self {
        if headroom.is_finite() {
            self.headroom = headroom.clamp(0.0, 1.0);
        }
        self
    }
}
