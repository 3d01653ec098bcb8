//! First-order analytic orbit of an equilateral constellation
//!
//! Each spacecraft flies its own slightly eccentric, slightly inclined
//! heliocentric orbit. To first order in the eccentricity
//! `e = L / (2√3 R)` the three orbits keep the spacecraft on an equilateral
//! triangle of side `L` whose plane is tilted 60° to the ecliptic and which
//! cartwheels once per year around its guiding centre:
//!
//! ```text
//! x_k = R cos α + ½ e R (cos(2α − β_k) − 3 cos β_k)
//! y_k = R sin α + ½ e R (sin(2α − β_k) − 3 sin β_k)
//! z_k = −√3 e R cos(α − β_k)
//! ```
//!
//! with `α` the orbital phase of the guiding centre and
//! `β_k = 2π(k − 1)/3 + β₀`. The Sun sits at the origin and the Earth moves on
//! a circular orbit of radius `R`.

use std::f64::consts::TAU;

use log::debug;
use nalgebra::Vector3;
use ndarray::Array1;
use pattern_math::{SpacecraftPositions, Vec3Batch};
use serde::{Deserialize, Serialize};

use crate::orbit::OrbitTable;
use crate::{EphemerisError, Result};

/// Astronomical unit in kilometres
pub const AU_KM: f64 = 1.495_978_707e8;

/// Sidereal year in days
pub const SIDEREAL_YEAR_DAYS: f64 = 365.256_363;

/// Parameters of an analytic constellation orbit. Lengths are in kilometres,
/// angles in degrees and times in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticConstellation {
    /// Nominal arm length
    pub arm_length_km: f64,
    /// Radius of the guiding centre orbit
    pub orbit_radius_km: f64,
    /// Angle by which the guiding centre leads the Earth (negative trails)
    pub lead_angle_deg: f64,
    /// Ecliptic longitude of the Earth at the epoch
    pub earth_longitude_deg: f64,
    /// Initial cartwheel phase β₀
    pub initial_phase_deg: f64,
    /// Julian date of the first sample
    pub epoch_jd: f64,
    /// Sample spacing
    pub step_days: f64,
    /// Number of samples
    pub samples: usize,
}

impl Default for AnalyticConstellation {
    /// A Taiji-like constellation, 3 × 10⁶ km arms, 20° ahead of the Earth,
    /// sampled daily for 367 days
    fn default() -> Self {
        Self {
            arm_length_km: 3.0e6,
            orbit_radius_km: AU_KM,
            lead_angle_deg: 20.0,
            earth_longitude_deg: 0.0,
            initial_phase_deg: 0.0,
            epoch_jd: 2_461_041.5,
            step_days: 1.0,
            samples: 367,
        }
    }
}

impl AnalyticConstellation {
    /// Orbital eccentricity of each spacecraft, `L / (2√3 R)`
    pub fn eccentricity(&self) -> f64 {
        self.arm_length_km / (2.0 * 3f64.sqrt() * self.orbit_radius_km)
    }

    fn validate(&self) -> Result<()> {
        if !(self.arm_length_km > 0.0 && self.arm_length_km.is_finite()) {
            return Err(EphemerisError::InvalidParameter(format!(
                "arm length must be positive, got {}",
                self.arm_length_km
            )));
        }
        if !(self.orbit_radius_km > self.arm_length_km && self.orbit_radius_km.is_finite()) {
            return Err(EphemerisError::InvalidParameter(format!(
                "orbit radius {} must exceed the arm length {}",
                self.orbit_radius_km, self.arm_length_km
            )));
        }
        if !(self.step_days > 0.0 && self.step_days.is_finite()) {
            return Err(EphemerisError::InvalidParameter(format!(
                "step must be positive, got {} days",
                self.step_days
            )));
        }
        if self.samples == 0 {
            return Err(EphemerisError::Empty);
        }
        Ok(())
    }

    /// Guiding centre phase α at `days` after the epoch, radians
    fn center_phase(&self, days: f64) -> f64 {
        TAU * days / SIDEREAL_YEAR_DAYS
            + (self.earth_longitude_deg + self.lead_angle_deg).to_radians()
    }

    /// Position of spacecraft `k` (0-based) at guiding centre phase `alpha`
    pub fn spacecraft_position(&self, k: usize, alpha: f64) -> Vector3<f64> {
        let r = self.orbit_radius_km;
        let e = self.eccentricity();
        let beta = TAU * k as f64 / 3.0 + self.initial_phase_deg.to_radians();

        Vector3::new(
            r * alpha.cos() + 0.5 * e * r * ((2.0 * alpha - beta).cos() - 3.0 * beta.cos()),
            r * alpha.sin() + 0.5 * e * r * ((2.0 * alpha - beta).sin() - 3.0 * beta.sin()),
            -3f64.sqrt() * e * r * (alpha - beta).cos(),
        )
    }

    /// Sample the orbit into a table
    pub fn generate(&self) -> Result<OrbitTable> {
        self.validate()?;

        let days: Vec<f64> = (0..self.samples)
            .map(|i| i as f64 * self.step_days)
            .collect();
        let time_jd = Array1::from_iter(days.iter().map(|d| self.epoch_jd + d));

        let earth: Vec<Vector3<f64>> = days
            .iter()
            .map(|&d| {
                let phase = TAU * d / SIDEREAL_YEAR_DAYS + self.earth_longitude_deg.to_radians();
                Vector3::new(phase.cos(), phase.sin(), 0.0) * self.orbit_radius_km
            })
            .collect();

        let spacecraft = |k: usize| {
            let points: Vec<Vector3<f64>> = days
                .iter()
                .map(|&d| self.spacecraft_position(k, self.center_phase(d)))
                .collect();
            Vec3Batch::from_vectors(&points)
        };

        let positions = SpacecraftPositions::new(spacecraft(0), spacecraft(1), spacecraft(2))?;

        debug!(
            "Generated analytic orbit: {} samples, e = {:.3e}",
            self.samples,
            self.eccentricity()
        );

        Ok(OrbitTable {
            time_jd,
            sun: Vec3Batch::broadcast(&Vector3::zeros(), self.samples),
            earth: Vec3Batch::from_vectors(&earth),
            positions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pattern_math::DetectorFrame;

    #[test]
    fn test_default_orbit_shape() {
        let table = AnalyticConstellation::default().generate().unwrap();
        assert_eq!(table.len(), 367);
        assert_relative_eq!(table.time_jd[1] - table.time_jd[0], 1.0);
        assert_relative_eq!(table.sun.row(100).norm(), 0.0);
        assert_relative_eq!(table.earth.row(100).norm(), AU_KM, max_relative = 1e-12);
    }

    #[test]
    fn test_arms_stay_near_nominal_length() {
        let config = AnalyticConstellation::default();
        let table = config.generate().unwrap();
        for arms in table.arm_lengths() {
            for arm in arms {
                assert_relative_eq!(arm, config.arm_length_km, max_relative = 1e-2);
            }
        }
    }

    #[test]
    fn test_guiding_centre_on_reference_orbit() {
        let table = AnalyticConstellation::default().generate().unwrap();
        let center = table.constellation_center().unwrap();
        for c in center.iter() {
            assert_relative_eq!(c.norm(), AU_KM, max_relative = 1e-4);
            assert!(c.z.abs() < 1.0);
        }
    }

    #[test]
    fn test_leads_the_earth() {
        let table = AnalyticConstellation::default().generate().unwrap();
        let center = table.constellation_center().unwrap().row(0);
        let earth = table.earth.row(0);
        let angle = center.angle(&earth).to_degrees();
        assert_relative_eq!(angle, 20.0, epsilon = 0.1);
        // Counter-clockwise seen from ecliptic north
        assert!(earth.cross(&center).z > 0.0);
    }

    #[test]
    fn test_plane_tilted_sixty_degrees() {
        let table = AnalyticConstellation::default().generate().unwrap();
        let frame = DetectorFrame::from_positions(&table.positions).unwrap();
        for ez in frame.ez().iter() {
            let tilt = ez.z.abs().acos().to_degrees();
            assert_relative_eq!(tilt, 60.0, epsilon = 0.5);
        }
    }

    #[test]
    fn test_invalid_parameters() {
        let bad_arm = AnalyticConstellation {
            arm_length_km: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            bad_arm.generate(),
            Err(EphemerisError::InvalidParameter(_))
        ));

        let bad_step = AnalyticConstellation {
            step_days: 0.0,
            ..Default::default()
        };
        assert!(bad_step.generate().is_err());

        let empty = AnalyticConstellation {
            samples: 0,
            ..Default::default()
        };
        assert!(matches!(empty.generate(), Err(EphemerisError::Empty)));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: AnalyticConstellation =
            serde_json::from_str(r#"{ "lead_angle_deg": -20.0, "samples": 10 }"#).unwrap();
        assert_eq!(config.samples, 10);
        assert_eq!(config.lead_angle_deg, -20.0);
        assert_eq!(config.arm_length_km, 3.0e6);
    }
}
