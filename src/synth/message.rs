use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Control messages from the transport to the audio thread.
///
/// `voice` indexes the session's voice bank; `note_id` is the index of the
/// timeline event, so a late release never cuts a newer note on the same voice.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn {
        voice: usize,
        note_id: u32,
        frequency: f32,
        velocity: f32,
    },
    NoteOff {
        voice: usize,
        note_id: u32,
    },
}

/// Transport state shared with the audio thread outside the message queue.
///
/// A full queue can delay notes but must never lose a silence or a volume
/// change, so both live here.
///
/// `silence_mark` is the number of messages sent before the latest silence.
/// The renderer discards every message below the mark and then cuts all
/// voices, so notes queued before a pause or stop never sound after it.
#[derive(Debug)]
pub struct SharedControls {
    silence_mark: AtomicU64,
    gain_bits: AtomicU32,
}

impl SharedControls {
    pub fn new(gain: f32) -> Self {
        Self {
            silence_mark: AtomicU64::new(0),
            gain_bits: AtomicU32::new(clamp_gain(gain).to_bits()),
        }
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain_bits.load(Ordering::Relaxed))
    }

    /// Clamped to [0, 1]; NaN is ignored.
    pub fn set_gain(&self, gain: f32) {
        if !gain.is_nan() {
            self.gain_bits.store(clamp_gain(gain).to_bits(), Ordering::Relaxed);
        }
    }

    /// Cut every voice once the first `sent` messages have been consumed.
    pub fn silence_after(&self, sent: u64) {
        self.silence_mark.fetch_max(sent, Ordering::Release);
    }

    pub fn silence_mark(&self) -> u64 {
        self.silence_mark.load(Ordering::Acquire)
    }
}

fn clamp_gain(gain: f32) -> f32 {
    if gain.is_nan() {
        0.0
    } else {
        gain.clamp(0.0, 1.0)
    }
}
