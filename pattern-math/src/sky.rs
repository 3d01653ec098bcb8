//! Source sky direction and orbital orientation
//!
//! A source is described by two fixed unit vectors in the barycentric frame:
//! the propagation-reversed sky direction N̂ and the orbital angular momentum
//! direction L̂. Both are constant across every timestamp of a run.

use std::f64::consts::TAU;

use nalgebra::{Rotation3, Unit, Vector3};
use rand::Rng;

use crate::error::{GeometryError, Result};
use crate::spherical::theta_phi_to_unit_vector;
use crate::vector::{normalize_vector, Vec3Batch};

/// Draw `count` unit vectors uniformly distributed on the sphere
///
/// Samples phi uniformly in [0, 2π) and cos(theta) uniformly in [-1, 1).
pub fn random_unit_vectors<R: Rng>(rng: &mut R, count: usize) -> Vec3Batch {
    let vectors: Vec<Vector3<f64>> = (0..count)
        .map(|_| {
            let phi = rng.gen::<f64>() * TAU;
            let cos_theta = rng.gen::<f64>() * 2.0 - 1.0;
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
            Vector3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
        })
        .collect();
    Vec3Batch::from_vectors(&vectors)
}

fn normalize_source_vector(v: &Vector3<f64>, name: &str) -> Result<Unit<Vector3<f64>>> {
    normalize_vector(v).map_err(|_| GeometryError::InvalidSource {
        reason: format!("{name} has norm {}", v.norm()),
    })
}

/// Fixed geometry of a gravitational-wave source: N̂ and L̂
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceGeometry {
    direction: Unit<Vector3<f64>>,
    angular_momentum: Unit<Vector3<f64>>,
}

impl SourceGeometry {
    /// Offset added to every component of N̂ to build a nearly face-on L̂
    pub const DEFAULT_FACE_ON_OFFSET: f64 = 1e-13;

    /// Create a source from explicit direction and angular momentum vectors.
    ///
    /// Both vectors are normalized.
    ///
    /// # Returns
    /// * `Err(GeometryError::InvalidSource)` - If either vector has zero or
    ///   non-finite norm, or if L̂ is exactly parallel to N̂, which leaves the
    ///   polarization angle undefined
    pub fn new(direction: Vector3<f64>, angular_momentum: Vector3<f64>) -> Result<Self> {
        let direction = normalize_source_vector(&direction, "direction")?;
        let angular_momentum = normalize_source_vector(&angular_momentum, "angular momentum")?;

        let separation = direction.cross(&angular_momentum.into_inner()).norm();
        if separation == 0.0 {
            return Err(GeometryError::InvalidSource {
                reason: "angular momentum is parallel to the direction".to_string(),
            });
        }

        Ok(Self {
            direction,
            angular_momentum,
        })
    }

    /// Create an approximately face-on source.
    ///
    /// L̂ = normalize(N̂ + offset·(1, 1, 1)), with N̂ normalized first.
    pub fn near_face_on(direction: Vector3<f64>, offset: f64) -> Result<Self> {
        let n_hat = normalize_vector(&direction)?;
        let l = n_hat.into_inner() + Vector3::repeat(offset);
        Self::new(n_hat.into_inner(), l)
    }

    /// Face-on source pointing at (theta, phi), in radians
    pub fn from_theta_phi(theta: f64, phi: f64, offset: f64) -> Result<Self> {
        Self::near_face_on(theta_phi_to_unit_vector(theta, phi).into_inner(), offset)
    }

    /// N̂, the unit sky direction
    pub fn direction(&self) -> &Unit<Vector3<f64>> {
        &self.direction
    }

    /// L̂, the unit orbital angular momentum direction
    pub fn angular_momentum(&self) -> &Unit<Vector3<f64>> {
        &self.angular_momentum
    }

    /// The same source seen after rotating the whole barycentric frame
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        Self {
            direction: Unit::new_normalize(rotation * self.direction.into_inner()),
            angular_momentum: Unit::new_normalize(rotation * self.angular_momentum.into_inner()),
        }
    }
}
