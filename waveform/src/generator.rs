//! Waveform generators
//!
//! Relativistic EMRI models (Teukolsky-based or kludge waveforms) are large
//! external codes; they plug in by implementing [`WaveformGenerator`]. The
//! built-in [`QuadrupoleGenerator`] is the leading-order quadrupole signal of
//! a binary on a circular orbit at the semi-major axis of the EMRI orbit,
//! enough to drive the detector response end to end.

use std::f64::consts::PI;

use log::debug;
use ndarray::Array1;

use crate::constants::PhysicalConstants;
use crate::params::{DerivedQuantities, EmriParams};
use crate::series::Waveform;
use crate::Result;

/// Source of (t, h+, h×) samples
pub trait WaveformGenerator {
    /// Short model name used in logs
    fn name(&self) -> &str;

    /// Generate samples on `[0, duration)` spaced by `step`
    fn generate(&self, params: &EmriParams) -> Result<Waveform>;
}

/// Leading-order quadrupole waveform of a circular binary:
///
/// ```text
/// h0 = 4 (G Mc)^(5/3) (π f)^(2/3) / (c⁴ D)
/// h+ = h0 · ½(1 + cos²ι) · cos(2πft)
/// h× = h0 · cos ι · sin(2πft)
/// ```
///
/// with `f` twice the Keplerian orbital frequency at the semi-major axis.
/// Eccentricity only enters through the semi-major axis and spins are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuadrupoleGenerator {
    pub constants: PhysicalConstants,
}

impl QuadrupoleGenerator {
    pub fn new(constants: PhysicalConstants) -> Self {
        Self { constants }
    }

    /// Gravitational-wave frequency in Hz
    pub fn frequency(&self, derived: &DerivedQuantities) -> f64 {
        let gm = self.constants.gravitational_constant * derived.total_mass_kg;
        let orbital_angular = (gm / derived.semi_major_axis_m.powi(3)).sqrt();
        orbital_angular / PI
    }

    /// Strain amplitude h0 at frequency `frequency`
    pub fn amplitude(&self, derived: &DerivedQuantities, frequency: f64) -> f64 {
        let c = self.constants.speed_of_light;
        let g = self.constants.gravitational_constant;
        4.0 * (g * derived.chirp_mass_kg).powf(5.0 / 3.0) * (PI * frequency).powf(2.0 / 3.0)
            / (c.powi(4) * derived.distance_m)
    }
}

impl WaveformGenerator for QuadrupoleGenerator {
    fn name(&self) -> &str {
        "quadrupole"
    }

    fn generate(&self, params: &EmriParams) -> Result<Waveform> {
        let derived = params.derive(&self.constants)?;
        let frequency = self.frequency(&derived);
        let h0 = self.amplitude(&derived, frequency);

        let cos_iota = params.inclination.cos();
        let plus_amplitude = h0 * 0.5 * (1.0 + cos_iota * cos_iota);
        let cross_amplitude = h0 * cos_iota;

        let time = Array1::from_shape_fn(params.sample_count(), |i| i as f64 * params.step);
        let phase = time.mapv(|t| 2.0 * PI * frequency * t);
        let h_plus = phase.mapv(|p| plus_amplitude * p.cos());
        let h_cross = phase.mapv(|p| cross_amplitude * p.sin());

        debug!(
            "{} waveform: f = {:.4e} Hz, h0 = {:.3e}, {} samples",
            self.name(),
            frequency,
            h0,
            time.len()
        );

        Waveform::new(time, h_plus, h_cross)
    }
}
