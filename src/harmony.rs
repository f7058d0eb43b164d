//! Aspect harmony evaluation.
//!
//! Maps the angular separation between two chart points onto a harmony value
//! in [0, 1]. Each canonical aspect contributes a triangular window centred on
//! its exact angle:
//!
//! ```text
//!   value
//!   base ┐      ╱╲
//!        │     ╱  ╲
//!      0 └────╱────╲────→ separation
//!          angle-8° angle+8°
//! ```
//!
//! Adjacent canonical angles are at least 30° apart, so with an 8° orb the
//! windows never overlap and at most one aspect matches a separation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum deviation from an exact aspect angle that still counts as the aspect.
pub const ORB_TOLERANCE: f64 = 8.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AspectKind {
    Conjunction,
    Sextile,
    Square,
    Trine,
    Opposition,
}

impl AspectKind {
    pub const ALL: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
    ];

    /// Exact separation in degrees
    pub fn angle(self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Opposition => 180.0,
        }
    }

    /// Harmony value at the exact angle
    pub fn base_value(self) -> f64 {
        match self {
            AspectKind::Conjunction => 1.0,
            AspectKind::Sextile => 0.8,
            AspectKind::Square => 0.3,
            AspectKind::Trine => 0.9,
            AspectKind::Opposition => 0.5,
        }
    }

    /// Multiplier applied to A4 when the aspect is sounded.
    pub fn pitch_multiplier(self) -> f64 {
        match self {
            AspectKind::Conjunction => 1.0,
            AspectKind::Sextile => 1.25,
            AspectKind::Square => 1.5,
            AspectKind::Trine => 1.33,
            AspectKind::Opposition => 2.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Opposition => "opposition",
        }
    }

    /// Case-insensitive lookup; unknown aspect types yield `None`.
    pub fn from_name(name: &str) -> Option<AspectKind> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    /// Harmony contribution of this aspect at a normalised separation.
    fn candidate(self, separation: f64) -> Option<f64> {
        let delta = (separation - self.angle()).abs();
        (delta <= ORB_TOLERANCE).then(|| self.base_value() * (1.0 - delta / ORB_TOLERANCE))
    }
}

/// Fold any angular difference into [0, 180].
pub fn normalize_separation(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        360.0 - wrapped
    } else {
        wrapped
    }
}

/// Harmony value in [0, 1] for the separation between two points.
///
/// Non-finite input evaluates to 0.
pub fn aspect_harmony(separation: f64) -> f64 {
    if !separation.is_finite() {
        return 0.0;
    }
    let separation = normalize_separation(separation);
    AspectKind::ALL
        .into_iter()
        .filter_map(|kind| kind.candidate(separation))
        .fold(0.0, f64::max)
}

/// The aspect whose orb contains `separation`, with the measured deviation from its exact angle.
pub fn nearest_aspect(separation: f64) -> Option<(AspectKind, f64)> {
    if !separation.is_finite() {
        return None;
    }
    let separation = normalize_separation(separation);
    AspectKind::ALL
        .into_iter()
        .map(|kind| (kind, (separation - kind.angle()).abs()))
        .filter(|&(_, delta)| delta <= ORB_TOLERANCE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
