#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Sound family a note is played with. Each class gets exactly one voice per session.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentClass {
    Lead,
    Pad,
    Pluck,
    Bell,
    Bass,
    Strings,
    Organ,
    /// Sustained wash used for aspects
    Ambient,
    /// Short unpitched-ish hits used for houses
    Percussion,
}

impl InstrumentClass {
    pub const ALL: [InstrumentClass; 9] = [
        InstrumentClass::Lead,
        InstrumentClass::Pad,
        InstrumentClass::Pluck,
        InstrumentClass::Bell,
        InstrumentClass::Bass,
        InstrumentClass::Strings,
        InstrumentClass::Organ,
        InstrumentClass::Ambient,
        InstrumentClass::Percussion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            InstrumentClass::Lead => "lead",
            InstrumentClass::Pad => "pad",
            InstrumentClass::Pluck => "pluck",
            InstrumentClass::Bell => "bell",
            InstrumentClass::Bass => "bass",
            InstrumentClass::Strings => "strings",
            InstrumentClass::Organ => "organ",
            InstrumentClass::Ambient => "ambient",
            InstrumentClass::Percussion => "percussion",
        }
    }
}

/// A single scheduled sound.
///
/// Events are plain data so externally built timelines can be handed to the
/// player; [`NoteEvent::validate`] is what the player checks before scheduling.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// Frequency in Hz, > 0
    pub pitch_hz: f64,
    /// Seconds from timeline start, >= 0
    pub start: f64,
    /// Seconds, > 0
    pub duration: f64,
    /// Loudness in [0, 1]
    pub velocity: f64,
    pub instrument: InstrumentClass,
}

impl NoteEvent {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Check the event invariants; `index` is reported in the error.
    pub fn validate(&self, index: usize) -> Result<(), InputError> {
        if !(self.pitch_hz.is_finite() && self.pitch_hz > 0.0) {
            return Err(InputError::InvalidPitch { index, value: self.pitch_hz });
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(InputError::InvalidDuration { index, value: self.duration });
        }
        if !(self.start.is_finite() && self.start >= 0.0) {
            return Err(InputError::InvalidStart { index, value: self.start });
        }
        if !(0.0..=1.0).contains(&self.velocity) {
            return Err(InputError::InvalidVelocity { index, value: self.velocity });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note() -> NoteEvent {
        NoteEvent {
            pitch_hz: 440.0,
            start: 0.0,
            duration: 1.0,
            velocity: 0.5,
            instrument: InstrumentClass::Lead,
        }
    }

    #[test]
    fn valid_note_passes() {
        assert_eq!(note().validate(0), Ok(()));
        assert_eq!(note().end(), 1.0);
    }

    #[test]
    fn rejects_each_broken_field() {
        let bad_pitch = NoteEvent { pitch_hz: 0.0, ..note() };
        assert!(matches!(bad_pitch.validate(3), Err(InputError::InvalidPitch { index: 3, .. })));

        let nan_pitch = NoteEvent { pitch_hz: f64::NAN, ..note() };
        assert!(matches!(nan_pitch.validate(0), Err(InputError::InvalidPitch { .. })));

        let bad_duration = NoteEvent { duration: -1.0, ..note() };
        assert!(matches!(bad_duration.validate(0), Err(InputError::InvalidDuration { .. })));

        let bad_start = NoteEvent { start: f64::INFINITY, ..note() };
        assert!(matches!(bad_start.validate(0), Err(InputError::InvalidStart { .. })));

        let bad_velocity = NoteEvent { velocity: 1.5, ..note() };
        assert!(matches!(bad_velocity.validate(0), Err(InputError::InvalidVelocity { .. })));
    }
}
