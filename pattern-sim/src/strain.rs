//! Strain projected onto the two arm combinations
//!
//! Antenna patterns are computed on the orbit cadence (Julian dates), while
//! waveforms are sampled in seconds from their own start. With `epoch_jd` the
//! Julian date of waveform time zero, each pattern series is resampled with a
//! natural cubic spline onto the waveform times and combined:
//!
//! ```text
//! h_I  = F+1 · h+ + F×1 · h×
//! h_II = F+2 · h+ + F×2 · h×
//! ```

use log::debug;
use ndarray::{Array1, Zip};
use pattern_math::DetectorResponse;
use thiserror::Error;
use waveform::Waveform;

use crate::algo::{CubicSpline, SplineError};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrainError {
    #[error("Waveform spans {first}..{last} s but the orbit covers {start}..{end} s from the epoch")]
    OutOfCoverage {
        first: f64,
        last: f64,
        start: f64,
        end: f64,
    },

    #[error("Antenna pattern interpolation failed: {0}")]
    Spline(#[from] SplineError),
}

/// Detector strain of both arm combinations, sampled at the waveform times
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedStrain {
    /// Seconds since the epoch
    pub time: Array1<f64>,
    pub h_i: Array1<f64>,
    pub h_ii: Array1<f64>,
}

impl ProjectedStrain {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

/// Seconds elapsed from `epoch_jd` to each Julian date
pub fn seconds_since_epoch(time_jd: &Array1<f64>, epoch_jd: f64) -> Array1<f64> {
    time_jd.mapv(|jd| (jd - epoch_jd) * SECONDS_PER_DAY)
}

/// Project a waveform through the detector response.
///
/// # Arguments
/// * `response` - Antenna patterns on the orbit cadence, at least two rows
/// * `waveform` - Polarizations with time in seconds since `epoch_jd`
/// * `epoch_jd` - Julian date of waveform time zero
///
/// # Returns
/// * `Err(StrainError::OutOfCoverage)` - If any waveform sample falls outside
///   the orbit time span
pub fn project_strain(
    response: &DetectorResponse,
    waveform: &Waveform,
    epoch_jd: f64,
) -> Result<ProjectedStrain, StrainError> {
    let knots = seconds_since_epoch(&response.time, epoch_jd).to_vec();
    let spline = |values: &Array1<f64>| CubicSpline::new(&knots, &values.to_vec());

    let f_plus_1 = spline(&response.patterns.f_plus_1)?;
    let f_cross_1 = spline(&response.patterns.f_cross_1)?;
    let f_plus_2 = spline(&response.patterns.f_plus_2)?;
    let f_cross_2 = spline(&response.patterns.f_cross_2)?;

    let (first, last) = waveform.span();
    if !(f_plus_1.contains(first) && f_plus_1.contains(last)) {
        let (start, end) = f_plus_1.range();
        return Err(StrainError::OutOfCoverage {
            first,
            last,
            start,
            end,
        });
    }

    let t = waveform.time();
    let fp1 = f_plus_1.evaluate_many(t)?;
    let fc1 = f_cross_1.evaluate_many(t)?;
    let fp2 = f_plus_2.evaluate_many(t)?;
    let fc2 = f_cross_2.evaluate_many(t)?;

    let combine = |fp: &Array1<f64>, fc: &Array1<f64>| {
        Zip::from(fp)
            .and(fc)
            .and(waveform.h_plus())
            .and(waveform.h_cross())
            .map_collect(|&fp, &fc, &hp, &hc| fp * hp + fc * hc)
    };

    debug!(
        "Projected {} waveform samples onto {} orbit rows",
        waveform.len(),
        response.len()
    );

    Ok(ProjectedStrain {
        time: t.clone(),
        h_i: combine(&fp1, &fc1),
        h_ii: combine(&fp2, &fc2),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ephemeris::AnalyticConstellation;
    use nalgebra::Vector3;
    use pattern_math::{compute_response, DegeneracyPolicy, SourceGeometry};

    fn response(days: usize) -> DetectorResponse {
        let orbit = AnalyticConstellation {
            samples: days,
            ..Default::default()
        }
        .generate()
        .unwrap();
        let source = SourceGeometry::near_face_on(
            Vector3::new(-0.21754308, -0.88794532, -0.40525068),
            SourceGeometry::DEFAULT_FACE_ON_OFFSET,
        )
        .unwrap();
        compute_response(
            &orbit.time_jd,
            &orbit.positions,
            &source,
            DegeneracyPolicy::Abort,
        )
        .unwrap()
    }

    fn tone(duration: f64, step: f64) -> Waveform {
        let n = (duration / step) as usize;
        let time = Array1::from_shape_fn(n, |i| i as f64 * step);
        Waveform::new(
            time.clone(),
            time.mapv(|t| 1e-21 * (1e-3 * t).cos()),
            time.mapv(|t| 1e-21 * (1e-3 * t).sin()),
        )
        .unwrap()
    }

    #[test]
    fn test_strain_at_orbit_knots() {
        let response = response(5);
        let epoch = response.time[0];
        let waveform = tone(3.0 * SECONDS_PER_DAY, 3600.0);
        let strain = project_strain(&response, &waveform, epoch).unwrap();

        assert_eq!(strain.len(), waveform.len());
        // t = 1 day lands exactly on the second orbit row
        let i = 24;
        assert_eq!(waveform.time()[i], SECONDS_PER_DAY);
        let p = response.patterns.at(1);
        let hp = waveform.h_plus()[i];
        let hc = waveform.h_cross()[i];
        assert_relative_eq!(
            strain.h_i[i],
            p.f_plus_1 * hp + p.f_cross_1 * hc,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            strain.h_ii[i],
            p.f_plus_2 * hp + p.f_cross_2 * hc,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_strain_bounded_by_polarization_amplitude() {
        let response = response(10);
        let waveform = tone(8.0 * SECONDS_PER_DAY, 600.0);
        let strain = project_strain(&response, &waveform, response.time[0]).unwrap();
        // |F+ h+ + F× h×| <= sqrt(F+² + F×²) · sqrt(h+² + h×²) and |F| <= 1
        for v in strain.h_i.iter().chain(strain.h_ii.iter()) {
            assert!(v.abs() <= 1e-21 * 2f64.sqrt());
        }
    }

    #[test]
    fn test_waveform_outside_orbit_rejected() {
        let response = response(3);
        let waveform = tone(4.0 * SECONDS_PER_DAY, 3600.0);
        let err = project_strain(&response, &waveform, response.time[0]).unwrap_err();
        assert!(matches!(err, StrainError::OutOfCoverage { .. }));

        // Epoch before the orbit starts
        let short = tone(3600.0, 60.0);
        let err = project_strain(&response, &short, response.time[0] - 1.0).unwrap_err();
        assert!(matches!(err, StrainError::OutOfCoverage { .. }));
    }

    #[test]
    fn test_single_row_response_cannot_be_interpolated() {
        let response = response(1);
        let waveform = tone(60.0, 1.0);
        let err = project_strain(&response, &waveform, response.time[0]).unwrap_err();
        assert_eq!(err, StrainError::Spline(SplineError::TooFewKnots(1)));
    }

    #[test]
    fn test_seconds_since_epoch() {
        let jd = Array1::from_vec(vec![2461000.5, 2461001.0]);
        let s = seconds_since_epoch(&jd, 2461000.5);
        assert_eq!(s[0], 0.0);
        assert_relative_eq!(s[1], 43_200.0, epsilon = 1e-6);
    }
}
