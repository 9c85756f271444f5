//! Output formatting for exposure summaries and sun readings.
//!
//! This module provides formatters for rendering results in the formats
//! selectable with `--format` (text, rich, enhanced, json, etc.).

use std::io::{self, Write};

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;

use sunside_lib::output::{format_duration_ms, format_instant};
use sunside_lib::{
    side_runs, sun_position, Coordinate, Exposure, ExposureRenderMode, ExposureSummary, SideRun,
    SunSide,
};

use crate::terminal::{supports_color, ColorPalette};

/// Output formats accepted by `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable segment listing.
    #[default]
    Text,
    /// Minimal `+`/`|`/`-` run listing.
    Basic,
    /// Markdown with a per-side table.
    Rich,
    /// Short note suitable for pasting into a chat.
    Note,
    /// Colored tags and per-run sun details.
    Enhanced,
    /// Full summary as JSON.
    Json,
    /// GeoJSON FeatureCollection of colored segments.
    Geojson,
}

impl OutputFormat {
    /// Whether the logo banner and timing footer belong around this format.
    #[must_use]
    pub const fn is_decorated(self) -> bool {
        matches!(self, Self::Text | Self::Rich | Self::Enhanced)
    }
}

/// Print the CLI logo banner.
///
/// Uses Unicode box drawing when the locale allows it and respects
/// `NO_COLOR` / `TERM=dumb`.
pub fn print_logo() {
    use crate::terminal::{colors, supports_unicode};

    let (orange, red, reset) = if supports_color() {
        (colors::ORANGE, colors::RED, colors::RESET)
    } else {
        ("", "", "")
    };

    if supports_unicode() {
        println!(
            "{orange}╭──────────────────────────────────────╮{reset}
{orange}│{reset}  ☀  {red}S U N S I D E{reset}                    {orange}│{reset}
{orange}│{reset}     which side will the sun be on?   {orange}│{reset}
{orange}╰──────────────────────────────────────╯{reset}",
            orange = orange,
            red = red,
            reset = reset
        );
    } else {
        println!(
            "{color}+--------------------------------------+
|  SUNSIDE                             |
|  >> WHICH SIDE WILL THE SUN BE ON?   |
+--------------------------------------+{reset}",
            color = orange,
            reset = reset
        );
    }
}

/// Print the footer with elapsed time.
pub fn print_footer(elapsed: std::time::Duration) {
    use crate::terminal::colors;

    let (gray, reset) = if supports_color() {
        (colors::GRAY, colors::RESET)
    } else {
        ("", "")
    };

    let elapsed_ms = elapsed.as_millis();
    let time_str = if elapsed_ms < 1000 {
        format!("{}ms", elapsed_ms)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    };

    println!("\n{gray}Completed in {}{reset}", time_str);
}

/// Render an exposure summary in the requested format.
///
/// `merge` only affects GeoJSON output, where it collapses consecutive
/// segments on the same side into one feature.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_summary(
    summary: &ExposureSummary,
    format: OutputFormat,
    merge: bool,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => print!("{}", summary.render(ExposureRenderMode::PlainText)),
        OutputFormat::Rich => print!("{}", summary.render(ExposureRenderMode::RichText)),
        OutputFormat::Note => print!("{}", summary.render(ExposureRenderMode::Note)),
        OutputFormat::Basic => print!("{}", format_basic(summary)),
        OutputFormat::Enhanced => {
            let renderer = EnhancedRenderer::new(ColorPalette::detect());
            print!("{}", renderer.render(summary));
        }
        OutputFormat::Json => write_json(summary)?,
        OutputFormat::Geojson => write_json(&summary.to_geojson(merge))?,
    }
    Ok(())
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(io::Error::other)?;
    stdout.write_all(b"\n")?;
    Ok(())
}

/// Basic run listing.
///
/// Uses `+`/`|`/`-` prefixes for the start point, each same-side run and the
/// goal point.
#[must_use]
pub fn format_basic(summary: &ExposureSummary) -> String {
    let mut out = format!("+ {}\n", summary.start);
    for run in side_runs(&summary.segments) {
        out.push_str(&format!(
            "| {} {} ({:.1} km)\n",
            run.side.label(),
            format_duration_ms(run.duration_ms),
            run.distance_km
        ));
    }
    out.push_str(&format!("- {}\n", summary.goal));
    out.push_str(&format!(
        "sun left {}% / right {}%\n",
        summary.left_percent, summary.right_percent
    ));
    out
}

/// Renderer for the enhanced format: colored side tags with per-run sun details.
pub struct EnhancedRenderer {
    palette: ColorPalette,
}

impl EnhancedRenderer {
    /// Create a new enhanced renderer with the given color palette.
    #[must_use]
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    /// Render a summary to a string.
    #[must_use]
    pub fn render(&self, summary: &ExposureSummary) -> String {
        let p = &self.palette;
        let mut out = format!(
            "Sun exposure from {}{}{} to {}{}{} ({} segments):\n",
            p.white_bold,
            summary.start,
            p.reset,
            p.white_bold,
            summary.goal,
            p.reset,
            summary.segments.len()
        );

        out.push_str(&format!(
            "{} STRT {} ● {}{}{} (departs {})\n",
            p.tag_start,
            p.reset,
            p.white_bold,
            summary.start,
            p.reset,
            format_instant(&summary.departure)
        ));
        for run in side_runs(&summary.segments) {
            out.push_str(&self.render_run(&run));
            out.push_str(&self.render_run_details(summary, &run));
        }
        out.push_str(&format!(
            "{} GOAL {} ● {}{}{} (arrives {})\n",
            p.tag_goal,
            p.reset,
            p.white_bold,
            summary.goal,
            p.reset,
            format_instant(&summary.arrival)
        ));

        out.push_str(&self.render_footer(summary));
        out
    }

    fn run_tag(side: SunSide) -> &'static str {
        match side {
            SunSide::Left => " LEFT ",
            SunSide::Right => " RGHT ",
            SunSide::NoSun => " DARK ",
        }
    }

    fn render_run(&self, run: &SideRun) -> String {
        let p = &self.palette;
        let segments = run.last_segment - run.first_segment + 1;
        let label = if segments == 1 { "segment" } else { "segments" };
        format!(
            "{}{}{} {}●{} {} {}, {:.1} km, {}\n",
            p.side_tag(run.side),
            Self::run_tag(run.side),
            p.reset,
            p.side(run.side),
            p.reset,
            segments,
            label,
            run.distance_km,
            format_duration_ms(run.duration_ms)
        )
    }

    fn render_run_details(&self, summary: &ExposureSummary, run: &SideRun) -> String {
        let p = &self.palette;
        let Some(first) = summary.segments.get(run.first_segment) else {
            return String::new();
        };
        format!(
            "       {}│{} {}sun az {:>5.1}° alt {:>5.1}°{}{}, {}heading {:>5.1}°{}\n",
            p.gray,
            p.reset,
            p.cyan,
            first.sun.azimuth,
            first.sun.altitude,
            p.reset,
            p.gray,
            p.reset,
            first.heading_deg,
            p.reset
        )
    }

    fn render_footer(&self, summary: &ExposureSummary) -> String {
        let p = &self.palette;
        let left = format_duration_ms(summary.left_sun_ms);
        let right = format_duration_ms(summary.right_sun_ms);
        let dark = format_duration_ms(summary.no_sun_ms);
        let width = left.len().max(right.len()).max(dark.len());

        let mut out = String::new();
        out.push('\n');
        out.push_str(&format!(
            "{}───────────────────────────────────────{}\n",
            p.gray, p.reset
        ));
        out.push_str(&format!(
            "  {}Left sun:{}   {}{:>width$}{} {:>3}%\n",
            p.orange,
            p.reset,
            p.white_bold,
            left,
            p.reset,
            summary.left_percent,
            width = width
        ));
        out.push_str(&format!(
            "  {}Right sun:{}  {}{:>width$}{} {:>3}%\n",
            p.red,
            p.reset,
            p.white_bold,
            right,
            p.reset,
            summary.right_percent,
            width = width
        ));
        out.push_str(&format!(
            "  {}No sun:{}     {}{:>width$}{}\n",
            p.gray,
            p.reset,
            p.white_bold,
            dark,
            p.reset,
            width = width
        ));
        let advice_color = match (summary.exposure, summary.dominant_side) {
            (Exposure::Sunlit, Some(side)) => p.side(side),
            _ => p.gray,
        };
        out.push_str(&format!("\n{}{}{}\n", advice_color, summary.advice(), p.reset));
        out
    }
}

/// Sun position at one place and instant, as printed by `sunside sun`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SunReading {
    pub at: Coordinate,
    pub time: DateTime<Utc>,
    pub azimuth: f64,
    pub altitude: f64,
    pub above_horizon: bool,
}

impl SunReading {
    /// Sample the sun and classify it against `horizon_deg`.
    #[must_use]
    pub fn new(at: Coordinate, time: DateTime<Utc>, horizon_deg: f64) -> Self {
        let sun = sun_position(&time, &at);
        Self {
            at,
            time,
            azimuth: sun.azimuth,
            altitude: sun.altitude,
            above_horizon: sun.is_above(horizon_deg),
        }
    }
}

/// Render a sun reading in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization or writing fails.
pub fn render_sun(reading: &SunReading, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(reading)?,
        OutputFormat::Geojson => write_json(&json!({
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [reading.at.lng, reading.at.lat] },
            "properties": {
                "time": reading.time.to_rfc3339(),
                "azimuth": reading.azimuth,
                "altitude": reading.altitude,
                "above_horizon": reading.above_horizon,
            },
        }))?,
        OutputFormat::Basic | OutputFormat::Note => println!(
            "az {:.1} alt {:.1}",
            reading.azimuth, reading.altitude
        ),
        OutputFormat::Enhanced => {
            let p = ColorPalette::detect();
            let (color, state) = if reading.above_horizon {
                (p.yellow, "above horizon")
            } else {
                (p.gray, "below horizon")
            };
            println!(
                "{}{}{} at {}\n       {}│{} {}azimuth {:>5.1}° altitude {:>5.1}°{} {}({}){}",
                p.white_bold,
                reading.at,
                p.reset,
                format_instant(&reading.time),
                p.gray,
                p.reset,
                p.cyan,
                reading.azimuth,
                reading.altitude,
                p.reset,
                color,
                state,
                p.reset
            );
        }
        OutputFormat::Text | OutputFormat::Rich => println!("{}", format_sun_text(reading)),
    }
    Ok(())
}

/// One-line plain description of a sun reading.
#[must_use]
pub fn format_sun_text(reading: &SunReading) -> String {
    let state = if reading.above_horizon {
        "above the horizon"
    } else {
        "below the horizon"
    };
    format!(
        "Sun at {} on {}: azimuth {:.1}°, altitude {:.1}° ({})",
        reading.at,
        format_instant(&reading.time),
        reading.azimuth,
        reading.altitude,
        state
    )
}
