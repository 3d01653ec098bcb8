use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use ephemeris::{AnalyticConstellation, OrbitTable};
use log::info;
use nalgebra::Vector3;
use pattern_math::{
    random_unit_vectors, theta_phi_to_unit_vector, DegeneracyPolicy, SourceGeometry,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Parse a vector in format "x,y,z"
pub fn parse_vector(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("Vector must be in format 'x,y,z'".to_string());
    }

    let mut v = [0.0; 3];
    for (value, (part, name)) in v.iter_mut().zip(parts.iter().zip(["x", "y", "z"])) {
        *value = part
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("Invalid {name} value"))?;
    }
    Ok(v)
}

/// Parse sky angles in format "theta,phi" (degrees)
pub fn parse_sky_angles(s: &str) -> Result<(f64, f64), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 2 {
        return Err("Sky position must be in format 'theta,phi'".to_string());
    }

    let theta = parts[0]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid theta value".to_string())?;
    let phi = parts[1]
        .trim()
        .parse::<f64>()
        .map_err(|_| "Invalid phi value".to_string())?;

    if !(0.0..=180.0).contains(&theta) {
        return Err("Theta must lie in [0, 180] degrees".to_string());
    }

    Ok((theta, phi))
}

/// Parse an inclusive row window in format "start:end"
pub fn parse_row_window(s: &str) -> Result<(usize, usize), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err("Row window must be in format 'start:end'".to_string());
    }

    let start = parts[0]
        .trim()
        .parse::<usize>()
        .map_err(|_| "Invalid start row".to_string())?;
    let end = parts[1]
        .trim()
        .parse::<usize>()
        .map_err(|_| "Invalid end row".to_string())?;

    if start > end {
        return Err("Start row must not exceed end row".to_string());
    }

    Ok((start, end))
}

/// Handling of timestamps with degenerate geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Stop at the first degenerate row
    Abort,
    /// Drop degenerate rows and report them
    Skip,
}

impl From<PolicyArg> for DegeneracyPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Abort => DegeneracyPolicy::Abort,
            PolicyArg::Skip => DegeneracyPolicy::SkipRow,
        }
    }
}

/// Where the constellation orbit comes from
#[derive(Args, Debug, Clone)]
pub struct OrbitArgs {
    /// Orbit CSV file (timeJD, sunP*, earthP*, scp1*..scp3* columns)
    #[arg(long)]
    pub orbit: Option<PathBuf>,

    /// JSON parameters of the analytic orbit, used when --orbit is not given
    #[arg(long, conflicts_with = "orbit")]
    pub analytic_config: Option<PathBuf>,

    /// Inclusive row window of the orbit table (format: "start:end")
    #[arg(long, default_value = "0:366", value_parser = parse_row_window)]
    pub rows: (usize, usize),
}

impl OrbitArgs {
    /// Load or generate the orbit and cut it to the row window
    pub fn load(&self) -> Result<OrbitTable> {
        let table = match &self.orbit {
            Some(path) => OrbitTable::from_csv_path(path)
                .with_context(|| format!("Failed to load orbit from {}", path.display()))?,
            None => {
                let config = match &self.analytic_config {
                    Some(path) => {
                        let file = std::fs::File::open(path).with_context(|| {
                            format!("Failed to open orbit config {}", path.display())
                        })?;
                        let reader = std::io::BufReader::new(file);
                        serde_json::from_reader::<_, AnalyticConstellation>(reader)
                            .context("Failed to parse analytic orbit config")?
                    }
                    None => AnalyticConstellation::default(),
                };
                info!("Using analytic constellation orbit: {config:?}");
                config.generate()?
            }
        };

        let (start, end) = self.rows;
        Ok(table.window(start, end)?)
    }
}

/// Sky direction and orientation of the source
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Source sky direction N (format: "x,y,z", normalized on use)
    #[arg(
        long,
        default_value = "-0.21754308,-0.88794532,-0.40525068",
        value_parser = parse_vector
    )]
    pub direction: [f64; 3],

    /// Source sky position as "theta,phi" in degrees; overrides --direction
    #[arg(long, value_parser = parse_sky_angles, conflicts_with = "random_seed")]
    pub sky: Option<(f64, f64)>,

    /// Draw the sky direction uniformly at random with this seed; overrides --direction
    #[arg(long)]
    pub random_seed: Option<u64>,

    /// Orbital angular momentum L (format: "x,y,z"); default is nearly face-on
    #[arg(long, value_parser = parse_vector)]
    pub angular_momentum: Option<[f64; 3]>,

    /// Offset added to each component of N to build a nearly face-on L
    #[arg(long, default_value_t = SourceGeometry::DEFAULT_FACE_ON_OFFSET)]
    pub face_on_offset: f64,
}

impl SourceArgs {
    /// The sky direction N, before normalization
    pub fn direction(&self) -> Vector3<f64> {
        if let Some((theta, phi)) = self.sky {
            theta_phi_to_unit_vector(theta.to_radians(), phi.to_radians()).into_inner()
        } else if let Some(seed) = self.random_seed {
            random_unit_vectors(&mut StdRng::seed_from_u64(seed), 1).row(0)
        } else {
            Vector3::from(self.direction)
        }
    }

    pub fn source(&self) -> Result<SourceGeometry> {
        let direction = self.direction();
        let source = match self.angular_momentum {
            Some(l) => SourceGeometry::new(direction, Vector3::from(l)),
            None => SourceGeometry::near_face_on(direction, self.face_on_offset),
        };
        source.context("Invalid source geometry")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        orbit: OrbitArgs,
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, value_enum, default_value_t = PolicyArg::Abort)]
        policy: PolicyArg,
    }

    #[test]
    fn test_parse_vector() {
        assert_eq!(parse_vector("1, -2.5,3e-1"), Ok([1.0, -2.5, 0.3]));
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("1,a,3").is_err());
    }

    #[test]
    fn test_parse_row_window() {
        assert_eq!(parse_row_window("0:366"), Ok((0, 366)));
        assert!(parse_row_window("5:1").is_err());
        assert!(parse_row_window("-1:3").is_err());
        assert!(parse_row_window("3").is_err());
    }

    #[test]
    fn test_parse_sky_angles() {
        assert_eq!(parse_sky_angles("90,45"), Ok((90.0, 45.0)));
        assert!(parse_sky_angles("200,0").is_err());
    }

    #[test]
    fn test_defaults() {
        let cli = TestCli::parse_from(["test"]);
        assert_eq!(cli.orbit.rows, (0, 366));
        assert!(cli.orbit.orbit.is_none());
        assert_eq!(cli.policy, PolicyArg::Abort);

        let source = cli.source.source().unwrap();
        let n = Vector3::new(-0.21754308, -0.88794532, -0.40525068).normalize();
        assert_relative_eq!(source.direction().into_inner(), n, epsilon = 1e-15);
    }

    #[test]
    fn test_sky_angles_override_direction() {
        let cli = TestCli::parse_from(["test", "--sky", "90,90", "--policy", "skip"]);
        let n = cli.source.direction();
        assert_relative_eq!(n, Vector3::y(), epsilon = 1e-12);
        assert_eq!(DegeneracyPolicy::from(cli.policy), DegeneracyPolicy::SkipRow);
    }

    #[test]
    fn test_random_direction_is_reproducible() {
        let a = TestCli::parse_from(["test", "--random-seed", "3"]);
        let b = TestCli::parse_from(["test", "--random-seed", "3"]);
        assert_eq!(a.source.direction(), b.source.direction());
        assert_relative_eq!(a.source.direction().norm(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_parallel_angular_momentum_is_an_error() {
        let cli = TestCli::parse_from([
            "test",
            "--direction",
            "0,0,1",
            "--angular-momentum",
            "0,0,2",
        ]);
        assert!(cli.source.source().is_err());
    }

    #[test]
    fn test_orbit_sources_conflict() {
        let result =
            TestCli::try_parse_from(["test", "--orbit", "a.csv", "--analytic-config", "b.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_orbit_is_analytic() {
        let cli = TestCli::parse_from(["test", "--rows", "0:9"]);
        let table = cli.orbit.load().unwrap();
        assert_eq!(table.len(), 10);
    }
}
