//! Playback transport.
//!
//! A [`PlaybackEngine`] owns one output sink, one clock and at most one
//! [`PlaybackSession`](session::PlaybackSession). Every fire time is computed
//! when a timeline is accepted; the host then drives the session forward by
//! calling [`PlaybackEngine::tick`] periodically.

pub mod clock;
pub mod config;
pub mod event;
pub mod schedule;
pub mod session;
pub mod sink;
pub mod transport;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use event::{DeviceState, PlaybackEvent, SubscriptionId, TransportState};
pub use sink::{AudioSink, CpalSink, OfflineSink};
pub use transport::PlaybackEngine;
