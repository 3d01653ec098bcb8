//! Test helpers for the antenna-pattern workspace
//!
//! Common fixtures shared by the test suites of several crates: an output
//! directory for test artifacts, seeded random rotations, and a reference
//! constellation orbit that never degenerates.
//!
//! Fixtures return plain nalgebra/ndarray types so this crate does not depend
//! on any workspace crate.

use nalgebra::{Rotation3, Unit, Vector3};
use ndarray::Array2;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::env;
use std::f64::consts::{PI, TAU};
use std::path::{Path, PathBuf};

/// Astronomical unit in kilometres
pub const AU_KM: f64 = 1.495_978_707e8;

/// Nominal Taiji arm length in kilometres
pub const TAIJI_ARM_KM: f64 = 3.0e6;

/// Error type for test helper operations
#[derive(thiserror::Error, Debug)]
pub enum TestHelperError {
    #[error("Failed to find project root: {0}")]
    ProjectRootNotFound(String),
}

/// Returns the path to the workspace root directory.
///
/// Walks up from the current directory until a Cargo.toml declaring
/// `[workspace]` is found.
pub fn find_project_root() -> Result<PathBuf, TestHelperError> {
    let mut current_dir = env::current_dir().map_err(|e| {
        TestHelperError::ProjectRootNotFound(format!("Failed to get current directory: {}", e))
    })?;

    loop {
        let cargo_toml = current_dir.join("Cargo.toml");
        if cargo_toml.exists() {
            let content = std::fs::read_to_string(&cargo_toml).map_err(|e| {
                TestHelperError::ProjectRootNotFound(format!("Failed to read Cargo.toml: {}", e))
            })?;

            if content.contains("[workspace]") {
                return Ok(current_dir);
            }
        }

        if !current_dir.pop() {
            break;
        }
    }

    Err(TestHelperError::ProjectRootNotFound(
        "Workspace root not found".to_string(),
    ))
}

static PROJECT_ROOT: Lazy<PathBuf> =
    Lazy::new(|| find_project_root().expect("Failed to find project root directory"));

/// Directory for test artifacts such as response tables, created on demand
pub fn get_output_dir() -> PathBuf {
    let output_dir = PROJECT_ROOT.join("test_output");

    if !output_dir.exists() {
        std::fs::create_dir_all(&output_dir).expect("Failed to create output directory");
    }

    output_dir
}

/// Path of a file inside [`get_output_dir`]
pub fn output_path<P: AsRef<Path>>(path: P) -> PathBuf {
    get_output_dir().join(path)
}

/// A reproducible, non-trivial proper rotation
pub fn random_rotation(seed: u64) -> Rotation3<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let axis = loop {
        let candidate = Vector3::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if candidate.norm() > 0.1 {
            break Unit::new_normalize(candidate);
        }
    };
    let angle = rng.gen_range(0.2..PI);
    Rotation3::from_axis_angle(&axis, angle)
}

/// Heliocentric triangular constellation sampled every `step_days` days.
///
/// A rigid equilateral triangle of side [`TAIJI_ARM_KM`] whose centre moves
/// on a circular 1 AU orbit in the ecliptic. The triangle plane is tilted 60°
/// from the ecliptic and the triangle counter-rotates once per year.
///
/// # Returns
/// Positions of spacecraft 1, 2, 3 in km, each `samples × 3`
pub fn taiji_like_constellation(samples: usize, step_days: f64) -> [Array2<f64>; 3] {
    let mut out = [
        Array2::zeros((samples, 3)),
        Array2::zeros((samples, 3)),
        Array2::zeros((samples, 3)),
    ];
    let vertex_radius = TAIJI_ARM_KM / 3f64.sqrt();
    let (sin_tilt, cos_tilt) = (PI / 3.0).sin_cos();

    for i in 0..samples {
        let alpha = TAU * (i as f64 * step_days) / 365.25;
        let radial = Vector3::new(alpha.cos(), alpha.sin(), 0.0);
        let tangent = Vector3::new(-alpha.sin(), alpha.cos(), 0.0);
        let centre = radial * AU_KM;
        let e1 = radial * cos_tilt + Vector3::z() * sin_tilt;

        for (k, sc) in out.iter_mut().enumerate() {
            let beta = -alpha + TAU * k as f64 / 3.0;
            let p = centre + (e1 * beta.cos() + tangent * beta.sin()) * vertex_radius;
            sc[[i, 0]] = p.x;
            sc[[i, 1]] = p.y;
            sc[[i, 2]] = p.z;
        }
    }

    out
}
