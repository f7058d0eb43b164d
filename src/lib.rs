pub mod aspects;
pub mod chart; // Chart input model: planets, signs, houses, aspects
pub mod compatibility;
pub mod dsp;
#[cfg(feature = "rtrb")]
pub mod engine; // Playback transport, sessions and audio sinks
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod harmony;
pub mod mapping;
pub mod patch;
pub mod sequencing; // Note events, timelines and the chart sequencer
#[cfg(feature = "rtrb")]
pub mod synth; // Voice bank and control messages

pub use chart::{Chart, ChartPoint};
pub use compatibility::{compute_compatibility, CompatibilityScore};
#[cfg(feature = "rtrb")]
pub use engine::{PlaybackEngine, PlaybackEvent, TransportState};
pub use error::{DeviceError, InputError, PlaybackError};
pub use sequencing::{generate, Genre, InstrumentClass, NoteEvent, Timeline};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
