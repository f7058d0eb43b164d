//! Chart sequencer - turns a chart into a note timeline.
//!
//! Three independent streams are laid end to end on one running cursor:
//!
//! ```text
//!   t=0                                                         total
//!   ├─ planets ─────────────┼─ aspects ──────────┼─ houses ────────┤
//!   │ note ·0.1· note ·0.1· │ note ··0.2·· note  │ hit ·0.1· hit   │
//! ```
//!
//! Each note starts at the cursor; the cursor then moves past the note plus
//! a stream-specific gap. Identical charts always produce identical timelines.

use super::{
    event::{InstrumentClass, NoteEvent},
    timeline::{Genre, Timeline},
};
use crate::{
    chart::{Chart, ChartAspect, HouseCusp},
    harmony::AspectKind,
    mapping::{self, PLANET_PROFILES},
};

/// Reference tone that aspect multipliers scale.
pub const ASPECT_REFERENCE_HZ: f64 = 440.0;
pub const HOUSE_BASE_HZ: f64 = 220.0;
pub const HOUSE_STEP_HZ: f64 = 55.0;

const PLANET_GAP: f64 = 0.1;
const ASPECT_GAP: f64 = 0.2;
const HOUSE_GAP: f64 = 0.1;
const ASPECT_VELOCITY: f64 = 0.6;
const HOUSE_VELOCITY: f64 = 0.4;

/// Builder that appends notes at a running cursor.
pub struct TimelineBuilder {
    genre: Genre,
    events: Vec<NoteEvent>,
    cursor: f64,
}

impl TimelineBuilder {
    pub fn new(genre: Genre) -> Self {
        Self {
            genre,
            events: Vec::new(),
            cursor: 0.0,
        }
    }

    /// Append a note at the cursor, then advance past it and `gap`.
    pub fn note(
        &mut self,
        pitch_hz: f64,
        duration: f64,
        velocity: f64,
        instrument: InstrumentClass,
        gap: f64,
    ) -> &mut Self {
        self.events.push(NoteEvent {
            pitch_hz,
            start: self.cursor,
            duration,
            velocity,
            instrument,
        });
        self.cursor += duration + gap;
        self
    }

    /// The finished timeline and the final cursor position.
    pub fn build(self) -> (Timeline, f64) {
        (Timeline::new(self.events, self.genre), self.cursor)
    }
}

/// Generate the note timeline for a chart.
///
/// Returns the timeline and the total running time (the final cursor, which
/// includes the trailing gap of the last stream).
pub fn generate(chart: &Chart, genre: Genre) -> (Timeline, f64) {
    let mut builder = TimelineBuilder::new(genre);

    planet_stream(chart, &mut builder);
    if let Some(aspects) = &chart.aspects {
        aspect_stream(aspects, &mut builder);
    }
    if let Some(houses) = &chart.houses {
        house_stream(houses, &mut builder);
    }

    let (timeline, total) = builder.build();
    log::debug!(
        "generated {} events ({:.2}s) for {} genre",
        timeline.len(),
        total,
        genre
    );
    (timeline, total)
}

fn planet_stream(chart: &Chart, builder: &mut TimelineBuilder) {
    for profile in &PLANET_PROFILES {
        let Some(point) = chart.point(profile.name) else {
            continue;
        };
        match mapping::voice_point(&point, profile) {
            Some(voicing) => {
                builder.note(
                    voicing.pitch,
                    voicing.duration,
                    voicing.volume,
                    voicing.instrument,
                    PLANET_GAP,
                );
            }
            None => log::debug!("skipping {}: no usable house or degree", profile.name),
        }
    }
}

fn aspect_stream(aspects: &[ChartAspect], builder: &mut TimelineBuilder) {
    for aspect in aspects {
        let Some(kind) = AspectKind::from_name(&aspect.kind) else {
            log::debug!("skipping unsupported aspect type '{}'", aspect.kind);
            continue;
        };
        if !(aspect.orb.is_finite() && aspect.orb >= 0.0) {
            log::debug!("skipping {} with orb {}", kind.name(), aspect.orb);
            continue;
        }

        builder.note(
            ASPECT_REFERENCE_HZ * kind.pitch_multiplier(),
            1.0 + aspect.orb * 0.5,
            ASPECT_VELOCITY,
            InstrumentClass::Ambient,
            ASPECT_GAP,
        );
    }
}

fn house_stream(houses: &[HouseCusp], builder: &mut TimelineBuilder) {
    for (index, house) in houses.iter().enumerate() {
        builder.note(
            HOUSE_BASE_HZ + index as f64 * HOUSE_STEP_HZ,
            0.3 + f64::from(house.number) / 12.0 * 0.7,
            HOUSE_VELOCITY,
            InstrumentClass::Percussion,
            HOUSE_GAP,
        );
    }
}
