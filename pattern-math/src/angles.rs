//! Source angles in the detector frame
//!
//! [`project_to_frame`] gives the polar and azimuthal angles of the fixed sky
//! direction N̂ in each per-timestamp detector frame. [`polarization_angle`]
//! gives the polarization angle from the projected orbital angular momentum:
//!
//! ```text
//! psi = arctan( (L̂·ez − (L̂·N̂)(ez·N̂)) / (N̂·(L̂ × ez)) )
//! ```
//!
//! N̂ and L̂ are fixed per source. They are broadcast explicitly against the
//! per-timestamp `ez` rather than through implicit array broadcasting.

use nalgebra::{Unit, Vector3};
use ndarray::Array1;

use crate::error::{check_rows, GeometryError, Result};
use crate::frame::DetectorFrame;
use crate::sky::SourceGeometry;
use crate::spherical::{cartesian_to_theta_phi, AngleUnit};
use crate::vector::{cross, dot_fixed, normalize, Vec3Batch};

/// Per-timestamp (theta, phi, psi), all in radians
#[derive(Debug, Clone, PartialEq)]
pub struct SourceAngles {
    pub theta: Array1<f64>,
    pub phi: Array1<f64>,
    pub psi: Array1<f64>,
}

impl SourceAngles {
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }

    /// Compute every angle for a source in a set of detector frames
    pub fn compute(frame: &DetectorFrame, source: &SourceGeometry) -> Result<Self> {
        let (theta, phi) = project_to_frame(frame, source.direction())?;
        let psi = polarization_angle(source.angular_momentum(), source.direction(), frame.ez())?;
        Ok(Self { theta, phi, psi })
    }
}

/// Polar and azimuthal angle of N̂ in each detector frame, in radians.
///
/// The frame-local components (N̂·ex, N̂·ey, N̂·ez) are renormalized before
/// conversion to absorb rounding in the frame's orthonormality.
pub fn project_to_frame(
    frame: &DetectorFrame,
    direction: &Unit<Vector3<f64>>,
) -> Result<(Array1<f64>, Array1<f64>)> {
    let n = direction.into_inner();
    let local_x = dot_fixed(frame.ex(), &n);
    let local_y = dot_fixed(frame.ey(), &n);
    let local_z = dot_fixed(frame.ez(), &n);

    let local = Vec3Batch::from_component_arrays(&local_x, &local_y, &local_z)?;
    let local = normalize(&local)?;
    let angles = cartesian_to_theta_phi(&local, AngleUnit::Radians)?;

    Ok((angles.theta, angles.phi))
}

/// Polarization angle psi per timestamp, in radians within (−π/2, π/2).
///
/// # Arguments
/// * `angular_momentum` - L̂, fixed for the source
/// * `direction` - N̂, fixed for the source
/// * `ez` - Detector z-axis per timestamp
///
/// # Returns
/// * `Err(GeometryError::DegeneratePolarization)` - First row where
///   N̂·(L̂ × ez) is zero or the ratio is not finite. The value is reported,
///   never wrapped into a NaN that would poison the antenna patterns.
pub fn polarization_angle(
    angular_momentum: &Unit<Vector3<f64>>,
    direction: &Unit<Vector3<f64>>,
    ez: &Vec3Batch,
) -> Result<Array1<f64>> {
    let l = angular_momentum.into_inner();
    let n = direction.into_inner();
    let rows = ez.len();

    let l_dot_ez = dot_fixed(ez, &l);
    let ez_dot_n = dot_fixed(ez, &n);
    let l_dot_n = l.dot(&n);

    let l_cross_ez = cross(&Vec3Batch::broadcast(&l, rows), ez)?;
    let denominator = dot_fixed(&l_cross_ez, &n);
    check_rows(rows, denominator.len())?;

    let mut psi = Array1::zeros(rows);
    for row in 0..rows {
        let numerator = l_dot_ez[row] - l_dot_n * ez_dot_n[row];
        let den = denominator[row];
        let angle = (numerator / den).atan();
        if den == 0.0 || !angle.is_finite() {
            return Err(GeometryError::DegeneratePolarization {
                row,
                denominator: den,
            });
        }
        psi[row] = angle;
    }

    Ok(psi)
}
