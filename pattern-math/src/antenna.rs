//! Antenna pattern functions
//!
//! Plus and cross responses of the two independent arm combinations of a
//! triangular constellation, as closed-form functions of the source polar
//! angle theta, azimuth phi (both in the detector frame) and polarization
//! angle psi, all in radians:
//!
//! ```text
//! F+1 = ½(1+cos²θ)·cos2φ·cos2ψ − cosθ·sin2φ·sin2ψ
//! F×1 = ½(1+cos²θ)·cos2φ·sin2ψ + cosθ·sin2φ·cos2ψ
//! F+2 = ½(1+cos²θ)·sin2φ·cos2ψ + cosθ·cos2φ·sin2ψ
//! F×2 = ½(1+cos²θ)·sin2φ·sin2ψ − cosθ·cos2φ·cos2ψ
//! ```
//!
//! Term order and signs are fixed; a flipped sign silently inverts the cross
//! polarization response.
//!
//! NaN inputs propagate straight through these functions. Callers must not
//! feed angles from a degenerate geometry; the upstream frame and angle
//! routines report those as errors instead.

use ndarray::{Array1, Zip};

use crate::error::{check_rows, Result};

/// ½(1 + cos²θ)
#[inline]
fn half_one_plus_cos_sq(theta: f64) -> f64 {
    0.5 * (1.0 + theta.cos() * theta.cos())
}

/// Plus response of the first arm combination
pub fn f_plus_1(theta: f64, phi: f64, psi: f64) -> f64 {
    half_one_plus_cos_sq(theta) * (2.0 * phi).cos() * (2.0 * psi).cos()
        - theta.cos() * (2.0 * phi).sin() * (2.0 * psi).sin()
}

/// Cross response of the first arm combination
pub fn f_cross_1(theta: f64, phi: f64, psi: f64) -> f64 {
    half_one_plus_cos_sq(theta) * (2.0 * phi).cos() * (2.0 * psi).sin()
        + theta.cos() * (2.0 * phi).sin() * (2.0 * psi).cos()
}

/// Plus response of the second arm combination
pub fn f_plus_2(theta: f64, phi: f64, psi: f64) -> f64 {
    half_one_plus_cos_sq(theta) * (2.0 * phi).sin() * (2.0 * psi).cos()
        + theta.cos() * (2.0 * phi).cos() * (2.0 * psi).sin()
}

/// Cross response of the second arm combination
pub fn f_cross_2(theta: f64, phi: f64, psi: f64) -> f64 {
    half_one_plus_cos_sq(theta) * (2.0 * phi).sin() * (2.0 * psi).sin()
        - theta.cos() * (2.0 * phi).cos() * (2.0 * psi).cos()
}

/// The four antenna pattern values at one timestamp
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AntennaPattern {
    pub f_plus_1: f64,
    pub f_cross_1: f64,
    pub f_plus_2: f64,
    pub f_cross_2: f64,
}

impl AntennaPattern {
    pub fn evaluate(theta: f64, phi: f64, psi: f64) -> Self {
        Self {
            f_plus_1: f_plus_1(theta, phi, psi),
            f_cross_1: f_cross_1(theta, phi, psi),
            f_plus_2: f_plus_2(theta, phi, psi),
            f_cross_2: f_cross_2(theta, phi, psi),
        }
    }

    /// Polarization-averaged sensitivities (F+1² + F×1², F+2² + F×2²)
    pub fn power(&self) -> (f64, f64) {
        (
            self.f_plus_1 * self.f_plus_1 + self.f_cross_1 * self.f_cross_1,
            self.f_plus_2 * self.f_plus_2 + self.f_cross_2 * self.f_cross_2,
        )
    }
}

/// Antenna pattern time series, one value per timestamp and function
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaPatterns {
    pub f_plus_1: Array1<f64>,
    pub f_cross_1: Array1<f64>,
    pub f_plus_2: Array1<f64>,
    pub f_cross_2: Array1<f64>,
}

impl AntennaPatterns {
    /// Evaluate all four functions for every row of (theta, phi, psi).
    ///
    /// Rows are independent and are evaluated in parallel.
    ///
    /// # Returns
    /// * `Err(GeometryError::ShapeMismatch)` - If the angle arrays differ in length
    pub fn from_angles(theta: &Array1<f64>, phi: &Array1<f64>, psi: &Array1<f64>) -> Result<Self> {
        check_rows(theta.len(), phi.len())?;
        check_rows(theta.len(), psi.len())?;

        let patterns: Array1<AntennaPattern> = Zip::from(theta)
            .and(phi)
            .and(psi)
            .par_map_collect(|&t, &p, &s| AntennaPattern::evaluate(t, p, s));

        Ok(Self {
            f_plus_1: patterns.mapv(|p| p.f_plus_1),
            f_cross_1: patterns.mapv(|p| p.f_cross_1),
            f_plus_2: patterns.mapv(|p| p.f_plus_2),
            f_cross_2: patterns.mapv(|p| p.f_cross_2),
        })
    }

    pub fn len(&self) -> usize {
        self.f_plus_1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.f_plus_1.is_empty()
    }

    /// Values at a single timestamp
    ///
    /// # Panics
    /// If `row` is out of bounds.
    pub fn at(&self, row: usize) -> AntennaPattern {
        AntennaPattern {
            f_plus_1: self.f_plus_1[row],
            f_cross_1: self.f_cross_1[row],
            f_plus_2: self.f_plus_2[row],
            f_cross_2: self.f_cross_2[row],
        }
    }
}
