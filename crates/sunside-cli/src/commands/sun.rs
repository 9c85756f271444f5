//! Sun command handler: sample the solar model at one place and time.

use anyhow::{anyhow, Context, Result};
use chrono::Utc;

use sunside_lib::parse_start_time;

use crate::SunArgs;
use sunside_cli::output::{render_sun, OutputFormat, SunReading};

/// Handle the `sun` subcommand.
pub fn handle_sun(args: &SunArgs, format: OutputFormat) -> Result<()> {
    let time = parse_start_time(&args.time, Utc::now()).map_err(|err| {
        anyhow!("{err}\nhint: use 'now', an RFC 3339 timestamp or unix milliseconds")
    })?;
    let reading = SunReading::new(args.at, time, args.horizon);
    render_sun(&reading, format).context("failed to write output")?;
    Ok(())
}
