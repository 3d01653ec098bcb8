//! Antenna pattern and strain simulation
//!
//! Glues the orbit, geometry and waveform crates together: projects a
//! waveform through the time-dependent detector response, writes the result
//! tables and provides the command line arguments shared by the binaries.

pub mod algo;
pub mod io;
pub mod shared_args;
pub mod strain;

pub use algo::spline::{CubicSpline, SplineError};
pub use strain::{project_strain, seconds_since_epoch, ProjectedStrain, StrainError};
