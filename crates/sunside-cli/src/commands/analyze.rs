//! Analyze command handler: load a route, run the segmenter, render the summary.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use tracing::debug;

use sunside_lib::{
    parse_start_time, Error as LibError, ExposureSummary, FileRoute, RouteSource,
    SegmenterConfig, StraightLine, DEFAULT_SPEED_KMH,
};

use crate::AnalyzeArgs;
use sunside_cli::output::{render_summary, OutputFormat};

/// Environment variable consulted when `--speed` is not given.
pub const SPEED_ENV_VAR: &str = "SUNSIDE_SPEED_KMH";

/// Handle the `analyze` subcommand.
pub fn handle_analyze(args: &AnalyzeArgs, format: OutputFormat) -> Result<()> {
    let start = parse_start_time(&args.start, Utc::now()).map_err(explain)?;
    let config = SegmenterConfig {
        speed_kmh: resolve_speed(args.speed)?,
        horizon_deg: args.horizon,
    };
    debug!(%start, speed_kmh = config.speed_kmh, horizon_deg = config.horizon_deg, "analyze");

    let source = route_source(args)?;
    let route = source.fetch().map_err(explain).with_context(|| match &args.route {
        Some(path) => format!("failed to load route from {}", path.display()),
        None => "failed to build the great-circle route".to_string(),
    })?;

    let report = route.analyze(start, &config).map_err(explain)?;
    let summary = ExposureSummary::from_report(&report).map_err(explain)?;

    render_summary(&summary, format, args.merge).context("failed to write output")?;
    Ok(())
}

fn route_source(args: &AnalyzeArgs) -> Result<Box<dyn RouteSource>> {
    match (&args.route, args.from, args.to) {
        (Some(path), _, _) => Ok(Box::new(FileRoute::new(path.clone()))),
        (None, Some(from), Some(to)) => {
            let line = StraightLine::new(from, to);
            Ok(Box::new(match args.step_km {
                Some(step) => line.with_step_km(step),
                None => line,
            }))
        }
        _ => Err(anyhow!("provide either --route FILE or both --from and --to")),
    }
}

/// Speed from the flag, then the environment, then the default.
fn resolve_speed(flag: Option<f64>) -> Result<f64> {
    if let Some(speed) = flag {
        return Ok(speed);
    }
    match std::env::var(SPEED_ENV_VAR) {
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .with_context(|| format!("{SPEED_ENV_VAR}='{raw}' is not a number")),
        Err(_) => Ok(DEFAULT_SPEED_KMH),
    }
}

/// Attach a usage hint to library errors a user can fix from the command line.
fn explain(err: LibError) -> anyhow::Error {
    let hint = match &err {
        LibError::InvalidRoute { .. } => {
            "a route needs at least two points, latitude in [-90, 90], longitude in [-180, 180]"
        }
        LibError::InvalidTime { .. } => {
            "use 'now', an RFC 3339 timestamp such as 2024-06-21T12:00:00Z, or unix milliseconds"
        }
        LibError::InvalidConfig { .. } => {
            "--speed (or SUNSIDE_SPEED_KMH) and --step-km must be positive numbers"
        }
        LibError::UnsupportedRouteFormat { .. } => "rename the file to .json, .geojson or .csv",
        _ => return anyhow::Error::new(err),
    };
    anyhow!("{err}\nhint: {hint}")
}
