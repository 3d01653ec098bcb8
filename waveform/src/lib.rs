//! Gravitational waveforms from extreme-mass-ratio inspirals
//!
//! - [`PhysicalConstants`] - SI constants, passed explicitly to every
//!   computation that needs them
//! - [`EmriParams`] - Source parameters and the quantities derived from them
//! - [`WaveformGenerator`] - The seam a waveform model plugs into, with
//!   [`QuadrupoleGenerator`] as the built-in leading-order model
//! - [`Waveform`] - A sampled (t, h+, h×) series with CSV I/O

use thiserror::Error;

pub mod config;
pub mod constants;
pub mod generator;
pub mod params;
pub mod series;

pub use config::WaveformConfig;
pub use constants::PhysicalConstants;
pub use generator::{QuadrupoleGenerator, WaveformGenerator};
pub use params::{DerivedQuantities, EmriParams};
pub use series::{Waveform, WaveformRecord};

/// Error types for waveform generation and I/O
#[derive(Debug, Error)]
pub enum WaveformError {
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Series length mismatch: expected {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Sample times are not strictly increasing at row {row}")]
    NonMonotonicTime { row: usize },

    #[error("Waveform has no samples")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WaveformError>;
