use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::event::{InstrumentClass, NoteEvent};
use crate::error::InputError;

/// Genre hint for a rendering.
///
/// The hint never changes event pitches or timing; it picks the patch each
/// instrument class is played with.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Genre {
    #[default]
    Ambient,
    Electronic,
    Orchestral,
}

impl Genre {
    pub fn name(self) -> &'static str {
        match self {
            Genre::Ambient => "ambient",
            Genre::Electronic => "electronic",
            Genre::Orchestral => "orchestral",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ambient" => Ok(Genre::Ambient),
            "electronic" => Ok(Genre::Electronic),
            "orchestral" | "classical" => Ok(Genre::Orchestral),
            other => Err(format!("unknown genre '{other}' (expected ambient, electronic or orchestral)")),
        }
    }
}

/// Ordered note events for one chart (or chart pair).
///
/// Order is generation order; events may share a start time. The duration is
/// always derived from the events.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    events: Vec<NoteEvent>,
    #[cfg_attr(feature = "serde", serde(default))]
    genre: Genre,
}

impl Timeline {
    pub fn new(events: Vec<NoteEvent>, genre: Genre) -> Self {
        Self { events, genre }
    }

    pub fn events(&self) -> &[NoteEvent] {
        &self.events
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Latest end time over all events, 0 when empty.
    pub fn duration(&self) -> f64 {
        self.events.iter().map(NoteEvent::end).fold(0.0, f64::max)
    }

    /// Distinct instrument classes in first-use order.
    pub fn instruments(&self) -> Vec<InstrumentClass> {
        let mut seen = Vec::new();
        for event in &self.events {
            if !seen.contains(&event.instrument) {
                seen.push(event.instrument);
            }
        }
        seen
    }

    /// First invalid event, if any.
    pub fn validate(&self) -> Result<(), InputError> {
        self.events
            .iter()
            .enumerate()
            .try_for_each(|(index, event)| event.validate(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start: f64, duration: f64, instrument: InstrumentClass) -> NoteEvent {
        NoteEvent {
            pitch_hz: 220.0,
            start,
            duration,
            velocity: 0.5,
            instrument,
        }
    }

    #[test]
    fn duration_is_latest_end() {
        let timeline = Timeline::new(
            vec![
                event(0.0, 3.0, InstrumentClass::Pad),
                event(1.0, 0.5, InstrumentClass::Lead),
            ],
            Genre::Ambient,
        );
        assert_eq!(timeline.duration(), 3.0);
        assert_eq!(Timeline::default().duration(), 0.0);
    }

    #[test]
    fn instruments_are_distinct_in_first_use_order() {
        let timeline = Timeline::new(
            vec![
                event(0.0, 1.0, InstrumentClass::Bell),
                event(1.0, 1.0, InstrumentClass::Lead),
                event(2.0, 1.0, InstrumentClass::Bell),
            ],
            Genre::Ambient,
        );
        assert_eq!(timeline.instruments(), vec![InstrumentClass::Bell, InstrumentClass::Lead]);
    }

    #[test]
    fn validation_reports_offending_index() {
        let timeline = Timeline::new(
            vec![event(0.0, 1.0, InstrumentClass::Pad), event(1.0, 0.0, InstrumentClass::Pad)],
            Genre::Ambient,
        );
        assert!(matches!(
            timeline.validate(),
            Err(InputError::InvalidDuration { index: 1, .. })
        ));
    }

    #[test]
    fn genre_parses_from_cli_text() {
        assert_eq!("Electronic".parse::<Genre>(), Ok(Genre::Electronic));
        assert_eq!("classical".parse::<Genre>(), Ok(Genre::Orchestral));
        assert!("polka".parse::<Genre>().is_err());
    }
}
