//! Numerical helpers for time-series resampling

pub mod spline;

pub use spline::{CubicSpline, SplineError};
