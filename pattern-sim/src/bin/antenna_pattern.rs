//! Antenna pattern of a triangular constellation over its orbit
//!
//! Loads (or generates) the constellation orbit, computes the detector frame,
//! the source angles and the four antenna pattern functions for every
//! timestamp, and writes them as CSV.
//!
//! Usage:
//! ```
//! cargo run --bin antenna_pattern -- --orbit orbitDataTAIJI.dat --rows 0:366
//! ```
//!
//! See --help for detailed options.

use anyhow::{Context, Result};
use clap::Parser;
use ndarray::Array1;
use pattern_math::{compute_response, AngleUnit, DegeneracyPolicy};
use pattern_sim::io::{write_angles_csv, write_response_csv};
use pattern_sim::shared_args::{OrbitArgs, PolicyArg, SourceArgs};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Antenna Pattern",
    about = "Computes the time-dependent antenna pattern of a three-spacecraft detector",
    long_about = None
)]
struct Args {
    #[command(flatten)]
    orbit: OrbitArgs,

    #[command(flatten)]
    source: SourceArgs,

    /// Handling of rows with degenerate geometry
    #[arg(long, value_enum, default_value_t = PolicyArg::Abort)]
    policy: PolicyArg,

    /// Write angles in degrees instead of radians
    #[arg(long, default_value_t = false)]
    degrees: bool,

    /// Output directory for the CSV tables
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

fn range(values: &Array1<f64>) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Antenna Pattern");
    println!("===============");

    let orbit = args.orbit.load()?;
    let source = args.source.source()?;
    let policy = DegeneracyPolicy::from(args.policy);

    let n = source.direction();
    let l = source.angular_momentum();
    println!("Orbit rows: {}", orbit.len());
    println!(
        "  JD {:.3} to {:.3}",
        orbit.time_jd[0],
        orbit.time_jd[orbit.len() - 1]
    );
    let sky = orbit.center_sky_position()?;
    println!(
        "  Guiding centre at start: theta {:.2}°, phi {:.2}°",
        sky.theta[0], sky.phi[0]
    );
    let arms = orbit.arm_lengths();
    println!(
        "  Arm lengths at start: {:.6e}, {:.6e}, {:.6e}",
        arms[0][0], arms[0][1], arms[0][2]
    );
    println!("Source:");
    println!("  N = ({:.8}, {:.8}, {:.8})", n.x, n.y, n.z);
    println!("  L = ({:.8}, {:.8}, {:.8})", l.x, l.y, l.z);
    println!("  Policy: {policy:?}");

    let response = compute_response(&orbit.time_jd, &orbit.positions, &source, policy)
        .context("Antenna response computation failed")?;

    if !response.skipped.is_empty() {
        let rows: Vec<usize> = response.skipped.iter().map(|s| s.row).collect();
        println!("Skipped {} degenerate rows: {:?}", rows.len(), rows);
    }

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;
    let response_path = args.output_dir.join("antenna_response.csv");
    let angles_path = args.output_dir.join("source_angles.csv");
    let unit = if args.degrees {
        AngleUnit::Degrees
    } else {
        AngleUnit::Radians
    };

    write_response_csv(&response_path, &response)?;
    write_angles_csv(&angles_path, &response, unit)?;

    println!("\n=== Response ===");
    println!("Rows computed: {}", response.len());
    println!("Rows skipped: {}", response.skipped.len());
    let p = &response.patterns;
    for (name, values) in [
        ("F+1", &p.f_plus_1),
        ("Fx1", &p.f_cross_1),
        ("F+2", &p.f_plus_2),
        ("Fx2", &p.f_cross_2),
    ] {
        let (lo, hi) = range(values);
        println!("  {name}: [{lo:+.4}, {hi:+.4}]");
    }

    println!("\n=== Output Files ===");
    println!("Antenna patterns: {response_path:?}");
    println!("Source angles: {angles_path:?}");

    Ok(())
}
