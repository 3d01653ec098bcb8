//! EMRI waveform generation
//!
//! Generates (t, h+, h×) for an extreme-mass-ratio inspiral from a JSON
//! configuration of source parameters and physical constants and writes it
//! as `timeSecond, hp, hc` CSV.
//!
//! Usage:
//! ```
//! cargo run --bin emri_waveform -- --config emri.json --duration 86400
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use waveform::{QuadrupoleGenerator, WaveformConfig, WaveformGenerator};

#[derive(Parser, Debug)]
#[command(
    name = "EMRI Waveform",
    about = "Generates the plus and cross polarizations of an EMRI signal",
    long_about = None
)]
struct Args {
    /// JSON configuration with "params" and "constants" sections
    #[arg(long)]
    config: Option<PathBuf>,

    /// Signal duration in seconds (overrides the configuration)
    #[arg(long)]
    duration: Option<f64>,

    /// Sample spacing in seconds (overrides the configuration)
    #[arg(long)]
    step: Option<f64>,

    /// Output CSV file for the waveform
    #[arg(long, default_value = "waveDataEMRI.csv")]
    output: PathBuf,

    /// Print the effective configuration as JSON and exit
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => WaveformConfig::from_json_path(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => WaveformConfig::default(),
    };
    if let Some(duration) = args.duration {
        config.params.duration = duration;
    }
    if let Some(step) = args.step {
        config.params.step = step;
    }

    if args.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    let params = &config.params;
    let derived = params
        .derive(&config.constants)
        .context("Invalid source parameters")?;
    let generator = QuadrupoleGenerator::new(config.constants);

    println!("EMRI Waveform");
    println!("=============");
    println!("Source parameters:");
    println!("  BH mass: {:.3e} M☉", params.mass_bh);
    println!("  CO mass: {:.3e} M☉", params.mass_co);
    println!("  Spin |a|: {:.3}", derived.spin_magnitude);
    println!("  Mass ratio: {:.3e}", derived.mass_ratio);
    println!("  Eccentricity: {}", params.eccentricity);
    println!("  Semi-latus rectum: {} M", params.semi_latus_rectum);
    println!("  Inclination: {} rad", params.inclination);
    println!("Derived:");
    println!("  Total mass: {:.6e} kg", derived.total_mass_kg);
    println!("  GM/c²: {:.6e} m", derived.length_unit_m);
    println!("  Semi-latus rectum: {:.6e} m", derived.semi_latus_rectum_m);
    println!("  Semi-major axis: {:.6e} m", derived.semi_major_axis_m);
    println!("  Distance: {:.6e} m", derived.distance_m);
    println!(
        "Sampling: {} s every {} s ({} samples)",
        params.duration,
        params.step,
        params.sample_count()
    );

    let waveform = generator.generate(params)?;
    waveform
        .write_csv_path(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("\nModel: {}", generator.name());
    println!("GW frequency: {:.6e} Hz", generator.frequency(&derived));
    println!("Waveform written to {:?}", args.output);

    Ok(())
}
