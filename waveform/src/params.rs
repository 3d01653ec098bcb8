//! EMRI source parameters

use serde::{Deserialize, Serialize};

use crate::constants::PhysicalConstants;
use crate::{Result, WaveformError};

/// Parameters of an extreme-mass-ratio inspiral.
///
/// Masses are in solar masses, spins are dimensionless, the semi-latus rectum
/// is in units of GM/c² of the total mass and times are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmriParams {
    /// Mass of the central black hole
    pub mass_bh: f64,
    /// Spin vector of the central black hole
    pub spin_bh: [f64; 3],
    /// Mass of the compact object
    pub mass_co: f64,
    /// Spin vector of the compact object
    pub spin_co: [f64; 3],
    /// Orbital eccentricity, `0 <= e < 1`
    pub eccentricity: f64,
    /// Semi-latus rectum p in units of GM/c²
    pub semi_latus_rectum: f64,
    /// Inclination of the orbital plane to the line of sight, radians
    pub inclination: f64,
    /// Length of the generated signal
    pub duration: f64,
    /// Sample spacing
    pub step: f64,
    /// Luminosity distance in gigaparsecs
    pub distance_gpc: f64,
}

impl Default for EmriParams {
    fn default() -> Self {
        Self {
            mass_bh: 1e6,
            spin_bh: [0.0, 0.0, 0.9],
            mass_co: 10.0,
            spin_co: [0.0, 0.0, 0.0],
            eccentricity: 0.5,
            semi_latus_rectum: 20.0,
            inclination: 0.25,
            duration: 86_400.0,
            step: 4.0,
            distance_gpc: 1.0,
        }
    }
}

/// SI quantities derived from [`EmriParams`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedQuantities {
    /// |a| of the central black hole
    pub spin_magnitude: f64,
    /// m_CO / m_BH
    pub mass_ratio: f64,
    /// m_BH + m_CO, kg
    pub total_mass_kg: f64,
    /// (m_BH m_CO)^(3/5) / M^(1/5), kg
    pub chirp_mass_kg: f64,
    /// GM/c² of the total mass, m
    pub length_unit_m: f64,
    pub semi_latus_rectum_m: f64,
    /// p / (1 − e²), m
    pub semi_major_axis_m: f64,
    pub distance_m: f64,
}

fn spin_norm(spin: &[f64; 3]) -> f64 {
    spin.iter().map(|s| s * s).sum::<f64>().sqrt()
}

fn invalid(name: &'static str, reason: String) -> WaveformError {
    WaveformError::InvalidParameter { name, reason }
}

impl EmriParams {
    /// Check every parameter is finite and physically meaningful
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("mass_bh", self.mass_bh),
            ("mass_co", self.mass_co),
            ("semi_latus_rectum", self.semi_latus_rectum),
            ("duration", self.duration),
            ("step", self.step),
            ("distance_gpc", self.distance_gpc),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(invalid(name, format!("must be positive and finite, got {value}")));
            }
        }

        if self.mass_co > self.mass_bh {
            return Err(invalid(
                "mass_co",
                format!(
                    "compact object ({}) heavier than the black hole ({})",
                    self.mass_co, self.mass_bh
                ),
            ));
        }
        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(invalid(
                "eccentricity",
                format!("must lie in [0, 1), got {}", self.eccentricity),
            ));
        }
        if !self.inclination.is_finite() {
            return Err(invalid("inclination", "must be finite".to_string()));
        }
        for (name, spin) in [("spin_bh", &self.spin_bh), ("spin_co", &self.spin_co)] {
            let magnitude = spin_norm(spin);
            if !(magnitude <= 1.0) {
                return Err(invalid(name, format!("magnitude {magnitude} exceeds 1")));
            }
        }
        if self.step > self.duration {
            return Err(invalid(
                "step",
                format!("{} s is longer than the duration {} s", self.step, self.duration),
            ));
        }
        Ok(())
    }

    /// Validate and convert to SI quantities
    pub fn derive(&self, constants: &PhysicalConstants) -> Result<DerivedQuantities> {
        self.validate()?;

        let m_bh = self.mass_bh * constants.solar_mass;
        let m_co = self.mass_co * constants.solar_mass;
        let total_mass_kg = m_bh + m_co;
        let chirp_mass_kg = (m_bh * m_co).powf(0.6) / total_mass_kg.powf(0.2);
        let length_unit_m = constants.length_unit(total_mass_kg);
        let semi_latus_rectum_m = self.semi_latus_rectum * length_unit_m;

        Ok(DerivedQuantities {
            spin_magnitude: spin_norm(&self.spin_bh),
            mass_ratio: self.mass_co / self.mass_bh,
            total_mass_kg,
            chirp_mass_kg,
            length_unit_m,
            semi_latus_rectum_m,
            semi_major_axis_m: semi_latus_rectum_m / (1.0 - self.eccentricity * self.eccentricity),
            distance_m: constants.gigaparsecs_to_metres(self.distance_gpc),
        })
    }

    /// Number of samples in `[0, duration)`
    pub fn sample_count(&self) -> usize {
        (self.duration / self.step).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_derived_quantities() {
        let constants = PhysicalConstants::default();
        let d = EmriParams::default().derive(&constants).unwrap();

        assert_relative_eq!(d.spin_magnitude, 0.9, epsilon = 1e-15);
        assert_relative_eq!(d.mass_ratio, 1e-5, max_relative = 1e-12);
        assert_relative_eq!(
            d.total_mass_kg,
            1_000_010.0 * constants.solar_mass,
            max_relative = 1e-12
        );
        // GM/c² of ~10⁶ M☉ is ~1.48 × 10⁹ m
        assert_relative_eq!(d.length_unit_m, 1.4766e9, max_relative = 1e-3);
        assert_relative_eq!(d.semi_latus_rectum_m, 20.0 * d.length_unit_m);
        assert_relative_eq!(d.semi_major_axis_m, d.semi_latus_rectum_m / 0.75);
        assert_relative_eq!(d.distance_m, 3.0857e25, max_relative = 1e-4);
    }

    #[test]
    fn test_chirp_mass_of_equal_masses() {
        let params = EmriParams {
            mass_bh: 10.0,
            mass_co: 10.0,
            ..Default::default()
        };
        let constants = PhysicalConstants::default();
        let d = params.derive(&constants).unwrap();
        // M_c = m · 2^(-1/5) for equal masses
        assert_relative_eq!(
            d.chirp_mass_kg,
            10.0 * constants.solar_mass * 2f64.powf(-0.2),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_rejects_unphysical_parameters() {
        let cases = [
            EmriParams {
                mass_bh: 0.0,
                ..Default::default()
            },
            EmriParams {
                eccentricity: 1.0,
                ..Default::default()
            },
            EmriParams {
                spin_bh: [0.0, 0.8, 0.8],
                ..Default::default()
            },
            EmriParams {
                step: f64::NAN,
                ..Default::default()
            },
            EmriParams {
                mass_co: 2e6,
                ..Default::default()
            },
            EmriParams {
                duration: 2.0,
                step: 4.0,
                ..Default::default()
            },
        ];
        for params in cases {
            assert!(params.validate().is_err(), "{params:?} passed validation");
        }
    }

    #[test]
    fn test_sample_count() {
        assert_eq!(EmriParams::default().sample_count(), 21_600);
        let params = EmriParams {
            duration: 10.0,
            step: 4.0,
            ..Default::default()
        };
        assert_eq!(params.sample_count(), 3);
    }
}
