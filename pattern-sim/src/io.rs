//! CSV output of response, angle and strain tables
//!
//! Every table starts with a time column and uses the column names the
//! downstream analysis scripts expect.

use std::path::Path;

use anyhow::Result;
use pattern_math::{AngleUnit, DetectorResponse};

use crate::strain::ProjectedStrain;

/// Write `timeJD, Fp1, Fc1, Fp2, Fc2`
pub fn write_response_csv(path: &Path, response: &DetectorResponse) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["timeJD", "Fp1", "Fc1", "Fp2", "Fc2"])?;

    let patterns = &response.patterns;
    for i in 0..response.len() {
        wtr.write_record(&[
            format!("{:.6}", response.time[i]),
            format!("{:.12e}", patterns.f_plus_1[i]),
            format!("{:.12e}", patterns.f_cross_1[i]),
            format!("{:.12e}", patterns.f_plus_2[i]),
            format!("{:.12e}", patterns.f_cross_2[i]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `timeJD, theta, phi, psi` in the requested unit
pub fn write_angles_csv(path: &Path, response: &DetectorResponse, unit: AngleUnit) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["timeJD", "theta", "phi", "psi"])?;

    let angles = &response.angles;
    for i in 0..response.len() {
        wtr.write_record(&[
            format!("{:.6}", response.time[i]),
            format!("{:.12e}", unit.from_radians(angles.theta[i])),
            format!("{:.12e}", unit.from_radians(angles.phi[i])),
            format!("{:.12e}", unit.from_radians(angles.psi[i])),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `timeSecond, hI, hII`
pub fn write_strain_csv(path: &Path, strain: &ProjectedStrain) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["timeSecond", "hI", "hII"])?;

    for i in 0..strain.len() {
        wtr.write_record(&[
            format!("{:.3}", strain.time[i]),
            format!("{:.12e}", strain.h_i[i]),
            format!("{:.12e}", strain.h_ii[i]),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
