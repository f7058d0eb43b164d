//! Chart input model.
//!
//! Charts are produced by an external chart service and consumed read-only.
//! The JSON shape is:
//!
//! ```text
//! {
//!   "planets": { "Sun": { "longitude": 125.4, "sign": { "degree": 5.4 }, "house": 5, "retrograde": false } },
//!   "aspects": [ { "type": "trine", "angle": 120, "orb": 2.1 } ],
//!   "houses":  [ { "number": 1 } ]
//! }
//! ```
//!
//! `aspects` and `houses` are optional; a missing list means "skip that stream".

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Degrees covered by one zodiac sign.
pub const SIGN_SPAN: f64 = 30.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chart {
    #[cfg_attr(feature = "serde", serde(default))]
    pub planets: BTreeMap<String, PlanetPosition>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub aspects: Option<Vec<ChartAspect>>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub houses: Option<Vec<HouseCusp>>,
}

/// One body's position as delivered by the chart service.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetPosition {
    /// Ecliptic longitude in degrees, [0, 360)
    pub longitude: f64,
    pub sign: SignPosition,
    /// House 1-12, absent when the chart was cast without a birth time
    #[cfg_attr(feature = "serde", serde(default))]
    pub house: Option<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub retrograde: bool,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SignPosition {
    /// Degree within the sign, [0, 30)
    pub degree: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

/// An aspect as listed by the chart service.
///
/// `kind` stays a free-form name: the service may emit aspect types this
/// crate does not sonify (quincunx, semi-sextile, ...).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChartAspect {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: String,
    pub angle: f64,
    pub orb: f64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub point_a: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub point_b: Option<String>,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct HouseCusp {
    pub number: u8,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub longitude: Option<f64>,
}

/// Read-only view of one planet in a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint<'a> {
    pub name: &'a str,
    pub longitude: f64,
    pub sign_degree: f64,
    pub house: Option<u8>,
    pub retrograde: bool,
}

impl ChartPoint<'_> {
    /// House number when it lies in 1..=12.
    pub fn valid_house(&self) -> Option<u8> {
        self.house.filter(|h| (1..=12).contains(h))
    }

    pub fn sign(&self) -> Option<Sign> {
        Sign::from_longitude(self.longitude)
    }
}

impl Chart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a chart from the chart service's JSON shape.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, crate::error::InputError> {
        serde_json::from_str(json).map_err(|e| crate::error::InputError::MalformedChart(e.to_string()))
    }

    /// Add (or replace) a planet
    pub fn with_planet(mut self, name: impl Into<String>, position: PlanetPosition) -> Self {
        self.planets.insert(name.into(), position);
        self
    }

    pub fn with_aspects(mut self, aspects: Vec<ChartAspect>) -> Self {
        self.aspects = Some(aspects);
        self
    }

    pub fn with_houses(mut self, numbers: impl IntoIterator<Item = u8>) -> Self {
        self.houses = Some(
            numbers
                .into_iter()
                .map(|number| HouseCusp { number, longitude: None })
                .collect(),
        );
        self
    }

    /// Fill a missing or empty aspect list with aspects detected between the planets.
    pub fn with_derived_aspects(mut self) -> Self {
        let has_aspects = self.aspects.as_ref().is_some_and(|a| !a.is_empty());
        if !has_aspects {
            let derived: Vec<ChartAspect> = crate::aspects::detect(&self)
                .into_iter()
                .map(|aspect| aspect.to_chart_aspect())
                .collect();
            log::debug!("derived {} aspects from planet longitudes", derived.len());
            self.aspects = Some(derived);
        }
        self
    }

    pub fn point(&self, name: &str) -> Option<ChartPoint<'_>> {
        self.planets
            .get_key_value(name)
            .map(|(name, position)| position.as_point(name))
    }

    /// All planets, ordered by name.
    pub fn points(&self) -> impl Iterator<Item = ChartPoint<'_>> {
        self.planets
            .iter()
            .map(|(name, position)| position.as_point(name))
    }

    pub fn is_empty(&self) -> bool {
        self.planets.is_empty()
            && self.aspects.as_ref().map_or(true, Vec::is_empty)
            && self.houses.as_ref().map_or(true, Vec::is_empty)
    }
}

impl PlanetPosition {
    /// Position derived from a longitude; the sign degree is the remainder within the sign.
    pub fn new(longitude: f64, house: Option<u8>) -> Self {
        Self {
            longitude,
            sign: SignPosition {
                degree: longitude.rem_euclid(SIGN_SPAN),
                name: Sign::from_longitude(longitude).map(|s| s.name().to_string()),
            },
            house,
            retrograde: false,
        }
    }

    pub fn retrograde(mut self) -> Self {
        self.retrograde = true;
        self
    }

    fn as_point<'a>(&self, name: &'a str) -> ChartPoint<'a> {
        ChartPoint {
            name,
            longitude: self.longitude,
            sign_degree: self.sign.degree,
            house: self.house,
            retrograde: self.retrograde,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Fire,
    Earth,
    Air,
    Water,
}

impl Element {
    pub const ALL: [Element; 4] = [Element::Fire, Element::Earth, Element::Air, Element::Water];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Sign {
    pub const ALL: [Sign; 12] = [
        Sign::Aries,
        Sign::Taurus,
        Sign::Gemini,
        Sign::Cancer,
        Sign::Leo,
        Sign::Virgo,
        Sign::Libra,
        Sign::Scorpio,
        Sign::Sagittarius,
        Sign::Capricorn,
        Sign::Aquarius,
        Sign::Pisces,
    ];

    /// Sign containing an ecliptic longitude; `None` for non-finite input.
    pub fn from_longitude(longitude: f64) -> Option<Sign> {
        if !longitude.is_finite() {
            return None;
        }
        let index = (longitude.rem_euclid(360.0) / SIGN_SPAN) as usize;
        Self::ALL.get(index.min(11)).copied()
    }

    /// Fire, earth, air and water repeat in zodiac order starting from Aries.
    pub fn element(self) -> Element {
        Element::ALL[self as usize % 4]
    }

    pub fn name(self) -> &'static str {
        match self {
            Sign::Aries => "Aries",
            Sign::Taurus => "Taurus",
            Sign::Gemini => "Gemini",
            Sign::Cancer => "Cancer",
            Sign::Leo => "Leo",
            Sign::Virgo => "Virgo",
            Sign::Libra => "Libra",
            Sign::Scorpio => "Scorpio",
            Sign::Sagittarius => "Sagittarius",
            Sign::Capricorn => "Capricorn",
            Sign::Aquarius => "Aquarius",
            Sign::Pisces => "Pisces",
        }
    }
}
