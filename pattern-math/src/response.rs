//! Detector response pipeline
//!
//! Chains the frame builder, the angle extractor and the antenna pattern
//! functions over a whole orbit:
//!
//! ```text
//! spacecraft positions ─► DetectorFrame ─► (theta, phi, psi) ─► F+1, F×1, F+2, F×2
//! ```

use log::{debug, warn};
use ndarray::Array1;

use crate::angles::SourceAngles;
use crate::antenna::AntennaPatterns;
use crate::error::{check_rows, GeometryError, Result};
use crate::frame::{DetectorFrame, SpacecraftPositions};
use crate::sky::SourceGeometry;

/// What to do with a timestamp whose geometry is degenerate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DegeneracyPolicy {
    /// Fail the whole batch on the first degenerate row
    #[default]
    Abort,
    /// Drop degenerate rows from the output and report them
    SkipRow,
}

/// A timestamp left out of a response under [`DegeneracyPolicy::SkipRow`]
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Index into the caller's input arrays
    pub row: usize,
    pub error: GeometryError,
}

/// Antenna response of the constellation over an orbit
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorResponse {
    /// Timestamps of the rows that were computed
    pub time: Array1<f64>,
    /// Source angles in the detector frame, radians
    pub angles: SourceAngles,
    pub patterns: AntennaPatterns,
    /// Rows dropped by [`DegeneracyPolicy::SkipRow`], in input order
    pub skipped: Vec<SkippedRow>,
}

impl DetectorResponse {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Frame, angles and patterns for a set of rows, all-or-nothing
fn evaluate(
    positions: &SpacecraftPositions,
    source: &SourceGeometry,
) -> Result<(SourceAngles, AntennaPatterns)> {
    let frame = DetectorFrame::from_positions(positions)?;
    let angles = SourceAngles::compute(&frame, source)?;
    let patterns = AntennaPatterns::from_angles(&angles.theta, &angles.phi, &angles.psi)?;
    Ok((angles, patterns))
}

/// Compute the antenna response for every timestamp.
///
/// # Arguments
/// * `time` - One timestamp per row, passed through to the output
/// * `positions` - Spacecraft positions aligned with `time`
/// * `source` - Fixed source direction and orbital orientation
/// * `policy` - Handling of degenerate rows
///
/// # Returns
/// * `Ok(DetectorResponse)` - Response for every row (or every non-degenerate
///   row under [`DegeneracyPolicy::SkipRow`])
/// * `Err(GeometryError::ShapeMismatch)` - If `time` and `positions` disagree in
///   length; checked before any computation
/// * `Err(GeometryError)` - Under [`DegeneracyPolicy::Abort`], the first
///   degenerate row, indexed against the input
///
/// Under [`DegeneracyPolicy::SkipRow`] each degenerate row costs one more pass
/// over the surviving rows, so k skipped rows cost O(k·N). Orbits are a few
/// hundred rows with rare degeneracies; a per-stage row mask would be needed
/// for long, heavily degenerate batches.
pub fn compute_response(
    time: &Array1<f64>,
    positions: &SpacecraftPositions,
    source: &SourceGeometry,
    policy: DegeneracyPolicy,
) -> Result<DetectorResponse> {
    check_rows(positions.len(), time.len())?;

    let mut kept: Vec<usize> = (0..time.len()).collect();
    let mut skipped = Vec::new();

    loop {
        let subset;
        let current = if skipped.is_empty() {
            positions
        } else {
            subset = positions.select(&kept);
            &subset
        };

        match evaluate(current, source) {
            Ok((angles, patterns)) => {
                let time = time.select(ndarray::Axis(0), &kept);
                debug!(
                    "computed antenna response for {} rows ({} skipped)",
                    time.len(),
                    skipped.len()
                );
                skipped.sort_by_key(|s: &SkippedRow| s.row);
                return Ok(DetectorResponse {
                    time,
                    angles,
                    patterns,
                    skipped,
                });
            }
            Err(err) => {
                let Some(local) = err.row() else {
                    return Err(err);
                };
                let row = kept[local];
                let err = err.with_row(row);

                match policy {
                    DegeneracyPolicy::Abort => return Err(err),
                    DegeneracyPolicy::SkipRow => {
                        warn!("skipping row {row}: {err}");
                        kept.remove(local);
                        skipped.push(SkippedRow { row, error: err });
                    }
                }
            }
        }
    }
}
