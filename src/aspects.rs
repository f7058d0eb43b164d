//! Aspect detection between the planets of one chart.

use crate::{
    chart::{Chart, ChartAspect},
    harmony::{nearest_aspect, normalize_separation, AspectKind},
    mapping::PLANET_PROFILES,
};

/// A derived angular relationship between two chart points.
#[derive(Debug, Clone, PartialEq)]
pub struct Aspect {
    pub kind: AspectKind,
    pub point_a: String,
    pub point_b: String,
    /// Deviation from the exact angle, in degrees
    pub delta: f64,
}

impl Aspect {
    pub fn to_chart_aspect(&self) -> ChartAspect {
        ChartAspect {
            kind: self.kind.name().to_string(),
            angle: self.kind.angle(),
            orb: self.delta,
            point_a: Some(self.point_a.clone()),
            point_b: Some(self.point_b.clone()),
        }
    }
}

/// Find every canonical aspect between pairs of classical bodies in the chart.
///
/// Pairs are visited in sequencing order (Sun, Moon, ...) so the output is
/// deterministic.
pub fn detect(chart: &Chart) -> Vec<Aspect> {
    let points: Vec<_> = PLANET_PROFILES
        .iter()
        .filter_map(|profile| chart.point(profile.name))
        .filter(|point| point.longitude.is_finite())
        .collect();

    let mut aspects = Vec::new();
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let separation = normalize_separation(a.longitude - b.longitude);
            if let Some((kind, delta)) = nearest_aspect(separation) {
                aspects.push(Aspect {
                    kind,
                    point_a: a.name.to_string(),
                    point_b: b.name.to_string(),
                    delta,
                });
            }
        }
    }
    aspects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::PlanetPosition;

    #[test]
    fn detects_aspects_in_sequencing_order() {
        let chart = Chart::new()
            .with_planet("Sun", PlanetPosition::new(10.0, Some(1)))
            .with_planet("Moon", PlanetPosition::new(132.0, Some(5)))
            .with_planet("Mars", PlanetPosition::new(190.0, Some(7)));

        let aspects = detect(&chart);
        let kinds: Vec<_> = aspects
            .iter()
            .map(|a| (a.point_a.as_str(), a.point_b.as_str(), a.kind))
            .collect();

        assert_eq!(
            kinds,
            vec![
                ("Sun", "Moon", AspectKind::Trine),
                ("Sun", "Mars", AspectKind::Opposition),
                ("Moon", "Mars", AspectKind::Sextile),
            ]
        );
        assert!((aspects[0].delta - 2.0).abs() < 1e-9);
    }

    #[test]
    fn chart_gains_derived_aspects_only_when_missing() {
        let chart = Chart::new()
            .with_planet("Sun", PlanetPosition::new(0.0, Some(1)))
            .with_planet("Venus", PlanetPosition::new(3.0, Some(1)))
            .with_derived_aspects();
        let aspects = chart.aspects.unwrap();
        assert_eq!(aspects.len(), 1);
        assert_eq!(aspects[0].kind, "conjunction");
        assert_eq!(aspects[0].point_a.as_deref(), Some("Sun"));

        let supplied = vec![ChartAspect {
            kind: "square".into(),
            angle: 90.0,
            orb: 1.0,
            point_a: None,
            point_b: None,
        }];
        let chart = Chart::new()
            .with_planet("Sun", PlanetPosition::new(0.0, Some(1)))
            .with_planet("Venus", PlanetPosition::new(3.0, Some(1)))
            .with_aspects(supplied.clone())
            .with_derived_aspects();
        assert_eq!(chart.aspects, Some(supplied));
    }
}
