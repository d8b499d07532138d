//! # Tide Draft Application Entry Point
//!
//! Command-line host for the draft engine: reads a forecast file, selects a
//! timestamp and a chart window, and prints the draft report as text or JSON.


use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use clap::{ArgAction, Parser, ValueHint};
use std::io;
use std::path::PathBuf;
use tide_draft_lib::{
    config::{Config, CONFIG_FILE},
    points::{display_label, ReferencePointRegistry},
    range::{default_window, window_ending, window_starting},
    renderer::{timestamp_listing, Report},
    tide_data, TideSeries,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Predicted draft at seabed points from a tidal forecast",
    long_about = None
)]
struct Cli {
    /// Tidal forecast CSV file
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Timestamp to evaluate (defaults to the first sample)
    #[arg(long, value_parser = parse_cli_timestamp)]
    at: Option<NaiveDateTime>,

    /// Start of the chart window (defaults to the first sample, or the
    /// configured window length before --to)
    #[arg(long, value_parser = parse_cli_timestamp)]
    from: Option<NaiveDateTime>,

    /// End of the chart window (defaults to the configured window length
    /// after the start, clipped to the last sample)
    #[arg(long, value_parser = parse_cli_timestamp)]
    to: Option<NaiveDateTime>,

    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE, value_hint = ValueHint::FilePath)]
    config: PathBuf,

    /// Minimum draft line in meters (overrides the configuration)
    #[arg(long)]
    min_draft: Option<f64>,

    /// Reference point as NAME=ELEVATION, repeatable (replaces configured points)
    #[arg(long = "point", value_parser = parse_point)]
    points: Vec<(String, f64)>,

    /// List the dates and times available in the forecast, then exit
    #[arg(long, action = ArgAction::SetTrue)]
    list: bool,

    /// Print the report as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Accept `2024-01-05 13:00`, `2024-01-05 13:00:00` or the forecast layout
fn parse_cli_timestamp(value: &str) -> Result<NaiveDateTime, String> {
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value.trim(), format).ok())
        .or_else(|| tide_data::parse_timestamp(value))
        .ok_or_else(|| format!("unrecognised timestamp {value:?}"))
}

fn parse_point(value: &str) -> Result<(String, f64), String> {
    let (name, elevation) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=ELEVATION, got {value:?}"))?;
    let elevation = elevation
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("elevation {elevation:?} is not a number"))?;
    Ok((name.trim().to_string(), elevation))
}

fn registry(cli: &Cli, config: &Config) -> ReferencePointRegistry {
    if cli.points.is_empty() {
        config.registry()
    } else {
        cli.points
            .iter()
            .map(|(name, elevation)| (display_label(name, *elevation), *elevation))
            .collect()
    }
}

fn window(
    cli: &Cli,
    config: &Config,
    series: &TideSeries,
) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let hours = config.display.window_hours;
    let window = match (cli.from, cli.to) {
        (Some(start), Some(end)) => (start, end),
        (Some(start), None) => window_starting(series, start, hours)?,
        (None, Some(end)) => window_ending(series, end, hours)?,
        (None, None) => default_window(series, hours)?,
    };
    Ok(window)
}

/// Main application entry point.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();

    let config = Config::load_from_path(&cli.config);
    let points = registry(&cli, &config);
    if points.is_empty() {
        return Err(anyhow!("no reference points configured"));
    }

    let series = tide_data::load(&cli.input)
        .with_context(|| format!("loading forecast {}", cli.input.display()))?;
    info!(samples = series.len(), points = points.len(), "forecast loaded");

    if cli.list {
        print!("{}", timestamp_listing(&series));
        return Ok(());
    }

    let timestamp = match cli.at {
        Some(t) => t,
        None => series
            .samples
            .first()
            .map(|s| s.timestamp)
            .context("forecast has no samples")?,
    };
    let window = window(&cli, &config, &series)?;
    let min_draft = cli.min_draft.unwrap_or(config.display.min_draft);
    debug!(%timestamp, start = %window.0, end = %window.1, min_draft, "building report");

    let report = Report::build(&series, points.all(), timestamp, window, min_draft)
        .context("computing drafts")?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.to_text());
    }
    Ok(())
}
