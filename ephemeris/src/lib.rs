//! Orbit data for a three-spacecraft constellation
//!
//! This crate provides the per-timestamp ephemeris the detector response is
//! computed from: positions of the Sun, the Earth and the three spacecraft in
//! a heliocentric (or barycentric) ecliptic frame, keyed by Julian date.
//!
//! Tables come either from an ephemeris CSV file ([`OrbitTable::from_csv_path`])
//! or from the first-order analytic orbit of an equilateral constellation
//! ([`AnalyticConstellation`]).

use pattern_math::GeometryError;
use thiserror::Error;

pub mod analytic;
pub mod orbit;

pub use analytic::AnalyticConstellation;
pub use orbit::{OrbitRecord, OrbitTable};

/// Error types for orbit loading and generation
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Orbit table has no rows")]
    Empty,

    #[error("Non-finite value in column {column} at row {row}")]
    NonFinite { row: usize, column: &'static str },

    #[error("Time is not strictly increasing at row {row}: {previous} then {current}")]
    NonMonotonicTime {
        row: usize,
        previous: f64,
        current: f64,
    },

    #[error("Row window {start}..={end} is outside a table of {len} rows")]
    InvalidWindow { start: usize, end: usize, len: usize },

    #[error("Invalid orbit parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

pub type Result<T> = std::result::Result<T, EphemerisError>;
