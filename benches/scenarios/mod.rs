//! Real-world scenario benchmarks: what the audio thread and the
//! sequencer actually do for a chart.

mod patches;
mod session;
mod sonify;

pub use patches::bench_patches;
pub use session::bench_session;
pub use sonify::bench_sonify;

use astrosonic::chart::{Chart, PlanetPosition};

/// Ten planets spread over the zodiac, with aspects derived from them.
pub fn sample_chart(offset: f64) -> Chart {
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
        chart.with_planet(name, PlanetPosition::new((lon + offset) % 360.0, Some(house)))
    })
    .with_houses(1..=12)
    .with_derived_aspects()
}
