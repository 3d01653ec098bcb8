//! pattern-math - Detector response geometry for a three-spacecraft
//! gravitational-wave constellation
//!
//! This crate turns per-timestamp spacecraft positions and a fixed source
//! orientation into antenna pattern time series:
//!
//! - **Vector** - Batched cross/dot/normalize over N × 3 arrays
//! - **Spherical** - Cartesian to (theta, phi) with theta measured from +z
//! - **Frame** - Orthonormal detector frame per timestamp
//! - **Angles** - Source angles and polarization angle in that frame
//! - **Antenna** - The four closed-form antenna pattern functions
//! - **Response** - The full pipeline with a degenerate-row policy
//!
//! Everything here is pure computation. Loading ephemerides and waveforms
//! lives in the `ephemeris` and `waveform` crates.
//!
//! # Example
//!
//! ```text
//! use pattern_math::{compute_response, DegeneracyPolicy, SourceGeometry};
//! use nalgebra::Vector3;
//!
//! let source = SourceGeometry::near_face_on(
//!     Vector3::new(-0.21754308, -0.88794532, -0.40525068),
//!     SourceGeometry::DEFAULT_FACE_ON_OFFSET,
//! )?;
//! let response = compute_response(&time, &positions, &source, DegeneracyPolicy::Abort)?;
//! println!("F+1 at t0: {}", response.patterns.f_plus_1[0]);
//! ```

pub mod angles;
pub mod antenna;
pub mod error;
pub mod frame;
pub mod response;
pub mod sky;
pub mod spherical;
pub mod vector;

// Re-export commonly used types
pub use angles::{polarization_angle, project_to_frame, SourceAngles};
pub use antenna::{f_cross_1, f_cross_2, f_plus_1, f_plus_2, AntennaPattern, AntennaPatterns};
pub use error::{GeometryError, Result};
pub use frame::{DetectorFrame, SpacecraftPositions, ARM_COLLINEARITY_EPSILON};
pub use response::{compute_response, DegeneracyPolicy, DetectorResponse, SkippedRow};
pub use sky::{random_unit_vectors, SourceGeometry};
pub use spherical::{
    cartesian_to_theta_phi, theta_phi_to_unit_vector, vector_to_theta_phi, AngleUnit, ThetaPhi,
};
pub use vector::{cross, dot, dot_fixed, normalize, normalize_vector, Vec3Batch};
