//! Error types for GeoTract

use thiserror::Error;

/// Main error type for GeoTract operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data acquisition failed: {0}")]
    Acquisition(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Unknown column: {0}")]
    MissingColumn(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Corridor is empty: no road geometry intersects the region boundary")]
    EmptyCorridor,

    #[error("Interpolation target {index} is empty or has zero area")]
    EmptyTarget { index: usize },

    #[error("Undefined ratio ({context}): total population is zero")]
    UndefinedRatio { context: String },

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Operation requires a projected CRS, got {0}")]
    UnprojectedCrs(String),

    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for GeoTract operations
pub type Result<T> = std::result::Result<T, Error>;
