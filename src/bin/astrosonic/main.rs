//! astrosonic - play a natal chart in the terminal
//!
//! Run with: cargo run -- chart.json --genre electronic

mod app;
mod logger;
mod ui;

use std::{fs, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use app::Astrosonic;
use astrosonic::{compute_compatibility, generate, Chart, Genre};

/// Sonify an astrological chart and play it through the default output device
#[derive(Parser)]
#[command(name = "astrosonic")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Chart JSON file
    chart: PathBuf,

    /// Genre hint: ambient, electronic or orchestral
    #[arg(short, long, default_value_t = Genre::Ambient)]
    genre: Genre,

    /// Output volume in [0, 1]
    #[arg(short, long, default_value_t = 0.7)]
    volume: f32,

    /// Second chart to score compatibility against
    #[arg(short, long)]
    partner: Option<PathBuf>,

    /// Compute aspects from planet positions when the chart has none
    #[arg(long)]
    derive_aspects: bool,
}

fn load_chart(path: &PathBuf, derive_aspects: bool) -> EyreResult<Chart> {
    let json = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read chart {}", path.display()))?;
    let chart = Chart::from_json(&json)
        .wrap_err_with(|| format!("failed to parse chart {}", path.display()))?;
    Ok(if derive_aspects {
        chart.with_derived_aspects()
    } else {
        chart
    })
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let status = logger::init(log::LevelFilter::Info)?;

    let chart = load_chart(&args.chart, args.derive_aspects)?;
    let (timeline, total) = generate(&chart, args.genre);
    log::info!("{} events, {total:.2}s", timeline.len());

    let compatibility = match &args.partner {
        Some(path) => {
            let partner = load_chart(path, false)?;
            Some(compute_compatibility(&chart, &partner))
        }
        None => None,
    };

    let title = args
        .chart
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart".to_string());

    Astrosonic::new(title, timeline, status)
        .volume(args.volume)
        .compatibility(compatibility)
        .run()
}
