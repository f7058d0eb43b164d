//! Low-level DSP primitives used by the graph nodes.
//!
//! Everything here is allocation-free once constructed, so it can live inside
//! voices rendered on the audio thread.

/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter with low/high/band-pass responses.
pub mod filter;
/// Band-limited-enough oscillators and a noise source.
pub mod oscillator;

pub use envelope::EnvelopeStage;
pub use oscillator::Waveform;
