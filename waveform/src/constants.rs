//! Physical constants in SI units

use serde::{Deserialize, Serialize};

/// Metres per parsec
pub const PARSEC_M: f64 = 3.085_677_581_491_367_3e16;

/// Constants used to convert source parameters into SI quantities.
///
/// Defaults are the CODATA 2018 / IAU 2015 values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Newtonian constant of gravitation, m³ kg⁻¹ s⁻²
    pub gravitational_constant: f64,
    /// Speed of light in vacuum, m s⁻¹
    pub speed_of_light: f64,
    /// Nominal solar mass, kg
    pub solar_mass: f64,
    /// Parsec, m
    pub parsec: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.674_30e-11,
            speed_of_light: 299_792_458.0,
            solar_mass: 1.988_409_870_698_051e30,
            parsec: PARSEC_M,
        }
    }
}

impl PhysicalConstants {
    /// GM/c² for a mass in kilograms: the geometric unit of length, metres
    pub fn length_unit(&self, mass_kg: f64) -> f64 {
        self.gravitational_constant * mass_kg / (self.speed_of_light * self.speed_of_light)
    }

    pub fn gigaparsecs_to_metres(&self, gpc: f64) -> f64 {
        gpc * 1e9 * self.parsec
    }
}
