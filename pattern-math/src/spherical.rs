//! Cartesian to spherical conversion
//!
//! One convention is used everywhere a (theta, phi) pair appears:
//!
//! - `phi` is the azimuth of (x, y), wrapped into `[0, 2π)`
//! - `theta` is the polar angle from the +z axis, `theta = π/2 − latitude`
//!
//! so `theta = 0` is the +z direction and `theta = π` is −z.

use std::f64::consts::{FRAC_PI_2, TAU};

use nalgebra::{Unit, Vector3};
use ndarray::Array1;

use crate::error::{GeometryError, Result};
use crate::vector::Vec3Batch;

/// Unit in which spherical angles are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Express an angle given in radians in this unit
    pub fn from_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Radians => value,
            AngleUnit::Degrees => value.to_degrees(),
        }
    }
}

/// Per-row polar and azimuthal angles
#[derive(Debug, Clone, PartialEq)]
pub struct ThetaPhi {
    pub theta: Array1<f64>,
    pub phi: Array1<f64>,
    pub unit: AngleUnit,
}

/// Convert a single vector to (theta, phi) in radians.
///
/// The vector does not need to be normalized.
///
/// # Returns
/// * `Err(GeometryError::InvalidDirection)` - If the vector has zero or non-finite norm
pub fn vector_to_theta_phi(v: &Vector3<f64>) -> Result<(f64, f64)> {
    let norm = v.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(GeometryError::InvalidDirection { row: 0, norm });
    }

    let latitude = v.z.atan2(v.x.hypot(v.y));
    let mut phi = v.y.atan2(v.x).rem_euclid(TAU);
    // rem_euclid can round a tiny negative azimuth up to exactly 2π
    if phi >= TAU {
        phi -= TAU;
    }
    Ok((FRAC_PI_2 - latitude, phi))
}

/// Convert a batch of (possibly non-unit) vectors to (theta, phi).
///
/// # Arguments
/// * `v` - Batch of direction vectors
/// * `unit` - Unit of the returned angles
///
/// # Returns
/// * `Ok(ThetaPhi)` - Angles for every row
/// * `Err(GeometryError::InvalidDirection)` - First row with zero norm
pub fn cartesian_to_theta_phi(v: &Vec3Batch, unit: AngleUnit) -> Result<ThetaPhi> {
    let mut theta = Array1::zeros(v.len());
    let mut phi = Array1::zeros(v.len());

    for (row, vector) in v.iter().enumerate() {
        let (t, p) = vector_to_theta_phi(&vector).map_err(|e| e.with_row(row))?;
        theta[row] = unit.from_radians(t);
        phi[row] = unit.from_radians(p);
    }

    Ok(ThetaPhi { theta, phi, unit })
}

/// Unit vector pointing at (theta, phi), both in radians.
///
/// Exact inverse of [`vector_to_theta_phi`] for the convention above.
pub fn theta_phi_to_unit_vector(theta: f64, phi: f64) -> Unit<Vector3<f64>> {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    Unit::new_normalize(Vector3::new(sin_t * cos_p, sin_t * sin_p, cos_t))
}
