//! Planet → sound mapping.
//!
//! Every classical body has a base tone, an instrument and an energy weight.
//! A planet's sign degree and house then bend that base tone with bounded
//! multiplicative factors:
//!
//! ```text
//!   pitch    = base × (1 + degree/360 × 0.5) × (1 + house/12 × 0.3)
//!   duration = (0.5 + house/12) × (0.5 + energy × 0.5)
//!   volume   = min(1, (0.3 + energy × 0.4) × (0.8 + house/12 × 0.2))
//! ```
//!
//! With degree in [0, 30) and house in [1, 12] the pitch factor stays below
//! 1.042 × 1.3 ≈ 1.354, well inside [1×, 1.95×] of the base tone.

use crate::{chart::ChartPoint, sequencing::InstrumentClass};

/// Static sound profile of one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetProfile {
    pub name: &'static str,
    /// Base tone in Hz
    pub base_frequency: f64,
    pub instrument: InstrumentClass,
    /// Energy weight in [0, 1]
    pub energy: f64,
}

/// The ten classical bodies in sequencing order.
///
/// Base tones are the "cosmic octave" planetary frequencies.
pub const PLANET_PROFILES: [PlanetProfile; 10] = [
    PlanetProfile { name: "Sun", base_frequency: 126.22, instrument: InstrumentClass::Lead, energy: 1.0 },
    PlanetProfile { name: "Moon", base_frequency: 210.42, instrument: InstrumentClass::Pad, energy: 0.6 },
    PlanetProfile { name: "Mercury", base_frequency: 141.27, instrument: InstrumentClass::Pluck, energy: 0.5 },
    PlanetProfile { name: "Venus", base_frequency: 221.23, instrument: InstrumentClass::Bell, energy: 0.55 },
    PlanetProfile { name: "Mars", base_frequency: 144.72, instrument: InstrumentClass::Bass, energy: 0.9 },
    PlanetProfile { name: "Jupiter", base_frequency: 183.58, instrument: InstrumentClass::Strings, energy: 0.8 },
    PlanetProfile { name: "Saturn", base_frequency: 147.85, instrument: InstrumentClass::Organ, energy: 0.7 },
    PlanetProfile { name: "Uranus", base_frequency: 207.36, instrument: InstrumentClass::Bell, energy: 0.65 },
    PlanetProfile { name: "Neptune", base_frequency: 211.44, instrument: InstrumentClass::Pad, energy: 0.45 },
    PlanetProfile { name: "Pluto", base_frequency: 140.25, instrument: InstrumentClass::Bass, energy: 0.75 },
];

/// Profile lookup by planet name (case-insensitive).
pub fn profile(name: &str) -> Option<&'static PlanetProfile> {
    PLANET_PROFILES
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}

pub fn pitch(base_frequency: f64, sign_degree: f64, house: u8) -> f64 {
    base_frequency * (1.0 + sign_degree / 360.0 * 0.5) * (1.0 + f64::from(house) / 12.0 * 0.3)
}

pub fn duration(house: u8, energy: f64) -> f64 {
    (0.5 + f64::from(house) / 12.0) * (0.5 + energy * 0.5)
}

pub fn volume(house: u8, energy: f64) -> f64 {
    ((0.3 + energy * 0.4) * (0.8 + f64::from(house) / 12.0 * 0.2)).min(1.0)
}

/// Pitch, duration and loudness for one planet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetVoicing {
    pub pitch: f64,
    pub duration: f64,
    pub volume: f64,
    pub instrument: InstrumentClass,
}

/// Voice a chart point with its profile.
///
/// Points without a house in 1..=12, or with non-finite degrees, produce
/// nothing; that is a skip, not an error.
pub fn voice_point(point: &ChartPoint<'_>, profile: &PlanetProfile) -> Option<PlanetVoicing> {
    let house = point.valid_house()?;
    if !point.sign_degree.is_finite() || !point.longitude.is_finite() {
        return None;
    }

    Some(PlanetVoicing {
        pitch: pitch(profile.base_frequency, point.sign_degree, house),
        duration: duration(house, profile.energy),
        volume: volume(house, profile.energy),
        instrument: profile.instrument,
    })
}
