//! Error taxonomy for chart input and playback.
//!
//! Input errors are raised before anything is scheduled, so a rejected
//! timeline never plays partially. Device errors are retryable: the engine
//! stays usable and the next `play()` or `initialize()` tries again.

use thiserror::Error;

/// Malformed note event or chart data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("event {index}: pitch must be a positive finite frequency, got {value}")]
    InvalidPitch { index: usize, value: f64 },

    #[error("event {index}: duration must be positive and finite, got {value}")]
    InvalidDuration { index: usize, value: f64 },

    #[error("event {index}: start time must be finite and non-negative, got {value}")]
    InvalidStart { index: usize, value: f64 },

    #[error("event {index}: velocity must lie in [0, 1], got {value}")]
    InvalidVelocity { index: usize, value: f64 },

    #[error("malformed chart: {0}")]
    MalformedChart(String),
}

/// Output device unavailable, suspended or failing mid-stream.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeviceError {
    #[error("no default output device available")]
    NoDevice,

    #[error("output device is not ready yet")]
    NotReady,

    #[error("failed to query output configuration: {0}")]
    Config(String),

    #[error("failed to open output stream: {0}")]
    Stream(String),

    #[error("output stream error: {0}")]
    Runtime(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}
