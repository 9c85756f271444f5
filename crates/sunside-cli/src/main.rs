use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sunside_cli::output::{print_footer, print_logo, OutputFormat};
use sunside_lib::{Coordinate, HORIZON_THRESHOLD_DEG};

mod commands;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Work out which side of the vehicle the sun will be on along a route"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Suppress the logo banner.
    #[arg(long, global = true)]
    no_logo: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify every segment of a route as sun-left, sun-right or no-sun.
    Analyze(AnalyzeArgs),
    /// Print the sun's azimuth and altitude for one place and time.
    Sun(SunArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["route", "from"])))]
pub struct AnalyzeArgs {
    /// Route file (.json, .geojson or .csv).
    #[arg(long, value_name = "FILE")]
    pub route: Option<PathBuf>,

    /// Start of a great-circle leg.
    #[arg(long, value_name = "LAT,LNG", requires = "to", allow_hyphen_values = true)]
    pub from: Option<Coordinate>,

    /// End of a great-circle leg.
    #[arg(long, value_name = "LAT,LNG", requires = "from", allow_hyphen_values = true)]
    pub to: Option<Coordinate>,

    /// Split the leg so no segment is longer than this many kilometres.
    #[arg(long, value_name = "KM", requires = "from")]
    pub step_km: Option<f64>,

    /// Departure: `now`, RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` (UTC) or unix milliseconds.
    #[arg(long, value_name = "WHEN", default_value = "now")]
    pub start: String,

    /// Travel speed in km/h (falls back to SUNSIDE_SPEED_KMH, then 50).
    #[arg(long, value_name = "KMH")]
    pub speed: Option<f64>,

    /// Sun altitude at or below which a segment counts as dark.
    #[arg(
        long,
        value_name = "DEG",
        default_value_t = HORIZON_THRESHOLD_DEG,
        allow_hyphen_values = true
    )]
    pub horizon: f64,

    /// Merge consecutive same-side segments in GeoJSON output.
    #[arg(long)]
    pub merge: bool,
}

/// Arguments for the `sun` subcommand.
#[derive(Args, Debug, Clone)]
pub struct SunArgs {
    /// Observer position.
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub at: Coordinate,

    /// Instant to sample, same layouts as `analyze --start`.
    #[arg(long, value_name = "WHEN", default_value = "now")]
    pub time: String,

    /// Horizon threshold used for the above/below flag.
    #[arg(
        long,
        value_name = "DEG",
        default_value_t = HORIZON_THRESHOLD_DEG,
        allow_hyphen_values = true
    )]
    pub horizon: f64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let started = Instant::now();
    let decorated = cli.format.is_decorated();
    if decorated && !cli.no_logo {
        print_logo();
    }

    match &cli.command {
        Command::Analyze(args) => commands::analyze::handle_analyze(args, cli.format)?,
        Command::Sun(args) => commands::sun::handle_sun(args, cli.format)?,
    }

    if decorated {
        print_footer(started.elapsed());
    }
    Ok(())
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let _ = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
}
