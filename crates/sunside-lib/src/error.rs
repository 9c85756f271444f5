use thiserror::Error;

/// Convenient result alias for the sunside library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a route is too short or carries an unusable coordinate.
    #[error("invalid route: {reason}")]
    InvalidRoute { reason: String },

    /// Raised when a start instant cannot be parsed or represented.
    #[error("invalid start time '{input}': {reason}")]
    InvalidTime { input: String, reason: String },

    /// Raised when segmenter or densification settings are out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a route file parses but does not describe a usable polyline.
    #[error("malformed route data: {message}")]
    RouteFormat { message: String },

    /// Raised when a route file extension has no decoder.
    #[error("unsupported route file format '{extension}'; expected .json, .geojson or .csv")]
    UnsupportedRouteFormat { extension: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn invalid_route(reason: impl Into<String>) -> Self {
        Error::InvalidRoute {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_time(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidTime {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn route_format(message: impl Into<String>) -> Self {
        Error::RouteFormat {
            message: message.into(),
        }
    }
}
