//! Projected detector strain
//!
//! Combines the constellation antenna patterns with an EMRI waveform to give
//! the strain seen by both arm combinations, h_I and h_II.
//!
//! Usage:
//! ```
//! cargo run --bin detector_strain -- --orbit orbitDataTAIJI.dat --waveform waveDataEMRI.csv
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use pattern_math::{compute_response, DegeneracyPolicy};
use pattern_sim::io::write_strain_csv;
use pattern_sim::project_strain;
use pattern_sim::shared_args::{OrbitArgs, PolicyArg, SourceArgs};
use std::path::PathBuf;
use waveform::{QuadrupoleGenerator, Waveform, WaveformConfig, WaveformGenerator};

#[derive(Parser, Debug)]
#[command(
    name = "Detector Strain",
    about = "Projects an EMRI waveform onto the arm combinations of a triangular detector",
    long_about = None
)]
struct Args {
    #[command(flatten)]
    orbit: OrbitArgs,

    #[command(flatten)]
    source: SourceArgs,

    /// Waveform CSV (timeSecond, hp, hc)
    #[arg(long)]
    waveform: Option<PathBuf>,

    /// Waveform JSON configuration, used when --waveform is not given
    #[arg(long, conflicts_with = "waveform")]
    waveform_config: Option<PathBuf>,

    /// Julian date of waveform time zero (default: first orbit row)
    #[arg(long)]
    epoch_jd: Option<f64>,

    /// Handling of rows with degenerate geometry
    #[arg(long, value_enum, default_value_t = PolicyArg::Abort)]
    policy: PolicyArg,

    /// Output CSV file for the strain
    #[arg(long, default_value = "strain.csv")]
    output: PathBuf,
}

fn load_waveform(args: &Args) -> Result<Waveform> {
    if let Some(path) = &args.waveform {
        return Waveform::from_csv_path(path)
            .with_context(|| format!("Failed to load waveform from {}", path.display()));
    }

    let config = match &args.waveform_config {
        Some(path) => WaveformConfig::from_json_path(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => WaveformConfig::default(),
    };
    let generator = QuadrupoleGenerator::new(config.constants);
    println!("Generating {} waveform", generator.name());
    Ok(generator.generate(&config.params)?)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    println!("Detector Strain");
    println!("===============");

    let orbit = args.orbit.load()?;
    let source = args.source.source()?;
    let policy = DegeneracyPolicy::from(args.policy);
    let epoch_jd = args.epoch_jd.unwrap_or(orbit.time_jd[0]);

    let response = compute_response(&orbit.time_jd, &orbit.positions, &source, policy)
        .context("Antenna response computation failed")?;
    println!(
        "Orbit: {} rows ({} skipped), epoch JD {:.6}",
        response.len(),
        response.skipped.len(),
        epoch_jd
    );

    let waveform = load_waveform(&args)?;
    let (first, last) = waveform.span();
    println!(
        "Waveform: {} samples, {:.1} s to {:.1} s",
        waveform.len(),
        first,
        last
    );

    let strain = project_strain(&response, &waveform, epoch_jd)
        .context("Strain projection failed")?;
    write_strain_csv(&args.output, &strain)?;

    let peak = |values: &ndarray::Array1<f64>| values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
    println!("\n=== Strain ===");
    println!("Peak |h_I|: {:.4e}", peak(&strain.h_i));
    println!("Peak |h_II|: {:.4e}", peak(&strain.h_ii));
    println!("Strain written to {:?}", args.output);

    Ok(())
}
