//! Route input for the sun-exposure segmenter.
//!
//! This module provides:
//! - [`Route`] - A validated, ordered polyline of at least two coordinates
//! - [`RouteSource`] - The seam to whatever produces route geometry
//! - [`FileRoute`] - Reads a route exported by a routing service (JSON, GeoJSON, CSV)
//! - [`StraightLine`] - A great-circle leg between two points, optionally densified
//!
//! # Routing services
//!
//! Turn-by-turn routing is an external collaborator. Whatever asynchronous
//! work it needs happens inside a [`RouteSource`] implementation; the
//! segmenter only ever sees the resolved [`Route`].
//!
//! # Example
//!
//! ```ignore
//! use sunside_lib::{FileRoute, RouteSource, SegmenterConfig};
//!
//! let route = FileRoute::new("commute.geojson").fetch()?;
//! let report = route.analyze(chrono::Utc::now(), &SegmenterConfig::default())?;
//! println!("{}% left / {}% right", report.left_percent(), report.right_percent());
//! ```

mod formats;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::exposure::{analyze_exposure, validate_points, ExposureReport, SegmenterConfig};
use crate::geo::{densify, haversine_distance_km, Coordinate};

/// Ordered travel path with at least two valid coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct Route {
    points: Vec<Coordinate>,
}

impl Route {
    /// Build a route, rejecting fewer than two points or invalid coordinates.
    pub fn new(points: Vec<Coordinate>) -> Result<Self> {
        validate_points(&points)?;
        Ok(Self { points })
    }

    /// Load a route from a file, choosing the decoder from its extension.
    ///
    /// Supported extensions are `.json`, `.geojson` and `.csv`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let points = match extension.as_str() {
            "json" | "geojson" => {
                let text = std::fs::read_to_string(path)?;
                formats::decode_json_str(&text)?
            }
            "csv" => {
                let file = std::fs::File::open(path)?;
                formats::decode_csv(file)?
            }
            _ => return Err(Error::UnsupportedRouteFormat { extension }),
        };

        let route = Self::new(points)?;
        info!(
            path = %path.display(),
            points = route.len(),
            distance_km = route.distance_km(),
            "loaded route"
        );
        Ok(route)
    }

    /// Parse a route from JSON or GeoJSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::new(formats::decode_json_str(text)?)
    }

    /// Parse a route from CSV with latitude/longitude columns.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Self::new(formats::decode_csv(reader)?)
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of points (always at least 2).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; routes hold at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    pub fn start(&self) -> Coordinate {
        self.points[0]
    }

    pub fn end(&self) -> Coordinate {
        self.points[self.points.len() - 1]
    }

    /// Total great-circle length in kilometres.
    pub fn distance_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| haversine_distance_km(&w[0], &w[1]))
            .sum()
    }

    /// Run the segmenter over this route.
    pub fn analyze(
        &self,
        start: DateTime<Utc>,
        config: &SegmenterConfig,
    ) -> Result<ExposureReport> {
        analyze_exposure(&self.points, start, config)
    }
}

impl TryFrom<Vec<Coordinate>> for Route {
    type Error = Error;

    fn try_from(points: Vec<Coordinate>) -> Result<Self> {
        Self::new(points)
    }
}

impl From<Route> for Vec<Coordinate> {
    fn from(route: Route) -> Self {
        route.points
    }
}

/// Anything that can produce a resolved [`Route`].
pub trait RouteSource {
    fn fetch(&self) -> Result<Route>;
}

/// Route stored in a file on disk.
#[derive(Debug, Clone)]
pub struct FileRoute {
    path: PathBuf,
}

impl FileRoute {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RouteSource for FileRoute {
    fn fetch(&self) -> Result<Route> {
        Route::from_path(&self.path)
    }
}

/// Great-circle leg between two points.
///
/// With `step_km` set, the leg is sampled so that no segment is longer than
/// the step; otherwise it is a single segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StraightLine {
    pub from: Coordinate,
    pub to: Coordinate,
    pub step_km: Option<f64>,
}

impl StraightLine {
    pub fn new(from: Coordinate, to: Coordinate) -> Self {
        Self {
            from,
            to,
            step_km: None,
        }
    }

    pub fn with_step_km(mut self, step_km: f64) -> Self {
        self.step_km = Some(step_km);
        self
    }
}

impl RouteSource for StraightLine {
    fn fetch(&self) -> Result<Route> {
        let points = match self.step_km {
            Some(step) => densify(&self.from, &self.to, step)?,
            None => vec![self.from, self.to],
        };
        Route::new(points)
    }
}
