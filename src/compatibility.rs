//! Dual-chart compatibility ("overlay") scoring.
//!
//! ```text
//!   composite = 0.5 × harmony + 0.3 × element + 0.2 × house
//! ```
//!
//! - harmony: mean aspect harmony between same-named planets of both charts
//! - element: shared fire/earth/air/water counts, 0.25 per shared planet
//! - house:   1.0 for planets in the same or opposite (6 apart) houses, else 0.3

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    chart::{Chart, ChartPoint, Element},
    harmony::aspect_harmony,
};

const HARMONY_WEIGHT: f64 = 0.5;
const ELEMENT_WEIGHT: f64 = 0.3;
const HOUSE_WEIGHT: f64 = 0.2;
const ELEMENT_SHARE: f64 = 0.25;
const HOUSE_MATCH: f64 = 1.0;
const HOUSE_MISMATCH: f64 = 0.3;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompatibilityScore {
    pub harmony_score: f64,
    pub element_score: f64,
    pub house_score: f64,
    pub composite: f64,
}

/// Which planet pairs the house measure compares.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HousePairing {
    /// Every planet of one chart against every planet of the other.
    #[default]
    CrossProduct,
    /// Only planets present in both charts, paired by name.
    MatchedNames,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompatibilityScorer {
    house_pairing: HousePairing,
}

impl CompatibilityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn house_pairing(mut self, pairing: HousePairing) -> Self {
        self.house_pairing = pairing;
        self
    }

    pub fn score(&self, a: &Chart, b: &Chart) -> CompatibilityScore {
        let harmony_score = harmony_score(a, b);
        let element_score = element_score(a, b);
        let house_score = match self.house_pairing {
            HousePairing::CrossProduct => cross_house_score(a, b),
            HousePairing::MatchedNames => matched_house_score(a, b),
        };

        CompatibilityScore {
            harmony_score,
            element_score,
            house_score,
            composite: harmony_score * HARMONY_WEIGHT
                + element_score * ELEMENT_WEIGHT
                + house_score * HOUSE_WEIGHT,
        }
    }
}

/// Score two charts with the default (cross product) house pairing.
///
/// The cross product compares every house of `a` with every house of `b`, so
/// a chart scored against itself stays below 1.0 unless every pair of its
/// occupied houses is the same or opposite. For a measure where identical charts score exactly 1.0, use
/// [`CompatibilityScorer`] with [`HousePairing::MatchedNames`].
pub fn compute_compatibility(a: &Chart, b: &Chart) -> CompatibilityScore {
    CompatibilityScorer::new().score(a, b)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn shared_points<'a>(
    a: &'a Chart,
    b: &'a Chart,
) -> impl Iterator<Item = (ChartPoint<'a>, ChartPoint<'a>)> {
    a.points()
        .filter_map(move |pa| b.point(pa.name).map(|pb| (pa, pb)))
}

fn harmony_score(a: &Chart, b: &Chart) -> f64 {
    mean(shared_points(a, b).map(|(pa, pb)| aspect_harmony((pa.longitude - pb.longitude).abs())))
}

fn element_counts(chart: &Chart) -> [u32; 4] {
    let mut counts = [0; 4];
    for element in chart.points().filter_map(|p| p.sign()).map(|s| s.element()) {
        counts[element.index()] += 1;
    }
    counts
}

fn element_score(a: &Chart, b: &Chart) -> f64 {
    let (ca, cb) = (element_counts(a), element_counts(b));
    let shared: f64 = Element::ALL
        .iter()
        .map(|e| f64::from(ca[e.index()].min(cb[e.index()])) * ELEMENT_SHARE)
        .sum();
    shared.clamp(0.0, 1.0)
}

fn house_affinity(ha: u8, hb: u8) -> f64 {
    match ha.abs_diff(hb) {
        0 | 6 => HOUSE_MATCH,
        _ => HOUSE_MISMATCH,
    }
}

fn cross_house_score(a: &Chart, b: &Chart) -> f64 {
    let houses_b: Vec<u8> = b.points().filter_map(|p| p.valid_house()).collect();
    mean(
        a.points()
            .filter_map(|p| p.valid_house())
            .flat_map(|ha| houses_b.iter().map(move |&hb| house_affinity(ha, hb))),
    )
}

fn matched_house_score(a: &Chart, b: &Chart) -> f64 {
    mean(shared_points(a, b).filter_map(|(pa, pb)| {
        Some(house_affinity(pa.valid_house()?, pb.valid_house()?))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PlanetPosition;
    use approx::assert_abs_diff_eq;

    fn full_chart() -> Chart {
        [
            ("Sun", 15.0, 1),
            ("Moon", 75.0, 3),
            ("Mercury", 100.0, 4),
            ("Venus", 140.0, 5),
            ("Mars", 200.0, 7),
            ("Jupiter", 250.0, 8),
            ("Saturn", 280.0, 9),
            ("Uranus", 310.0, 10),
            ("Neptune", 340.0, 11),
            ("Pluto", 355.0, 12),
        ]
        .into_iter()
        .fold(Chart::new(), |chart, (name, lon, house)| {
            chart.with_planet(name, PlanetPosition::new(lon, Some(house)))
        })
    }

    #[test]
    fn identical_charts_are_fully_harmonious() {
        let chart = full_chart();
        let score = compute_compatibility(&chart, &chart);

        assert_eq!(score.harmony_score, 1.0);
        assert_eq!(score.element_score, 1.0);
        assert!(score.house_score > 0.3 && score.house_score < 1.0);

        let matched = CompatibilityScorer::new()
            .house_pairing(HousePairing::MatchedNames)
            .score(&chart, &chart);
        assert_eq!(matched.house_score, 1.0);
        assert_abs_diff_eq!(matched.composite, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cross_product_self_score_needs_aligned_houses() {
        let aligned = Chart::new()
            .with_planet("Sun", PlanetPosition::new(0.0, Some(1)))
            .with_planet("Moon", PlanetPosition::new(90.0, Some(7)));
        assert_eq!(compute_compatibility(&aligned, &aligned).house_score, 1.0);

        let spread = Chart::new()
            .with_planet("Sun", PlanetPosition::new(0.0, Some(1)))
            .with_planet("Moon", PlanetPosition::new(90.0, Some(4)));
        // (1,1) and (4,4) match, (1,4) and (4,1) do not
        assert_abs_diff_eq!(
            compute_compatibility(&spread, &spread).house_score,
            0.65,
            epsilon = 1e-12
        );
    }

    #[test]
    fn no_shared_planets_means_no_harmony() {
        let a = Chart::new().with_planet("Sun", PlanetPosition::new(0.0, Some(1)));
        let b = Chart::new().with_planet("Moon", PlanetPosition::new(0.0, Some(1)));
        let score = compute_compatibility(&a, &b);

        assert_eq!(score.harmony_score, 0.0);
        assert_eq!(score.element_score, 0.25);
        assert_eq!(score.house_score, 1.0);
        assert_abs_diff_eq!(score.composite, 0.3 * 0.25 + 0.2, epsilon = 1e-12);
    }

    #[test]
    fn harmony_uses_separation_of_shared_planets() {
        let a = Chart::new()
            .with_planet("Sun", PlanetPosition::new(10.0, Some(1)))
            .with_planet("Moon", PlanetPosition::new(100.0, Some(4)));
        let b = Chart::new()
            .with_planet("Sun", PlanetPosition::new(130.0, Some(5)))
            .with_planet("Moon", PlanetPosition::new(144.0, Some(5)));

        // Sun: trine (0.9), Moon: 44° apart (0.0)
        let score = compute_compatibility(&a, &b);
        assert_abs_diff_eq!(score.harmony_score, 0.45, epsilon = 1e-12);
    }

    #[test]
    fn cross_product_counts_every_pair() {
        let a = Chart::new()
            .with_planet("Sun", PlanetPosition::new(0.0, Some(1)))
            .with_planet("Moon", PlanetPosition::new(0.0, Some(2)));
        let b = Chart::new().with_planet("Mars", PlanetPosition::new(0.0, Some(7)));

        // (1,7) → 6 apart → 1.0, (2,7) → 0.3
        let score = compute_compatibility(&a, &b);
        assert_abs_diff_eq!(score.house_score, 0.65, epsilon = 1e-12);
    }

    #[test]
    fn planets_without_houses_are_left_out_of_house_score() {
        let a = Chart::new().with_planet("Sun", PlanetPosition::new(0.0, None));
        let b = Chart::new().with_planet("Sun", PlanetPosition::new(0.0, Some(3)));
        assert_eq!(compute_compatibility(&a, &b).house_score, 0.0);
    }

    #[test]
    fn element_score_is_clamped() {
        let a = full_chart();
        let b = full_chart();
        assert!(element_score(&a, &b) <= 1.0);
        assert_eq!(element_score(&Chart::new(), &a), 0.0);
    }
}
