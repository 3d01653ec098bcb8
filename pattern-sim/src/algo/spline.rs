//! Natural cubic spline interpolation
//!
//! Used to resample antenna pattern series, computed on the orbit cadence
//! (typically daily), onto waveform sample times (seconds).
//!
//! Each segment is
//!
//! S(x) = a + b(x-xi) + c(x-xi)² + d(x-xi)³
//!
//! with C² continuity at the knots and zero second derivative at both ends.
//! Evaluation outside the knot range is an error; the spline never
//! extrapolates.

use ndarray::Array1;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SplineError {
    #[error("Knot and value arrays differ in length: {knots} knots, {values} values")]
    LengthMismatch { knots: usize, values: usize },

    #[error("Need at least 2 knots for interpolation, got {0}")]
    TooFewKnots(usize),

    #[error("Knots must be strictly increasing (index {index})")]
    UnsortedKnots { index: usize },

    #[error("Non-finite knot or value at index {index}")]
    NonFinite { index: usize },

    #[error("{x} is outside the knot range [{min}, {max}]")]
    OutOfRange { x: f64, min: f64, max: f64 },
}

#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    coeffs: Vec<[f64; 4]>, // a, b, c, d per segment
}

impl CubicSpline {
    /// Build the spline through `(x[i], y[i])`.
    ///
    /// # Arguments
    /// * `x` - Knots, strictly increasing
    /// * `y` - Values at the knots
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, SplineError> {
        if x.len() != y.len() {
            return Err(SplineError::LengthMismatch {
                knots: x.len(),
                values: y.len(),
            });
        }
        if x.len() < 2 {
            return Err(SplineError::TooFewKnots(x.len()));
        }
        if let Some(index) = (0..x.len()).find(|&i| !x[i].is_finite() || !y[i].is_finite()) {
            return Err(SplineError::NonFinite { index });
        }
        if let Some(index) = (1..x.len()).find(|&i| x[i] <= x[i - 1]) {
            return Err(SplineError::UnsortedKnots { index });
        }

        let coeffs = Self::compute_coefficients(x, y);
        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            coeffs,
        })
    }

    /// Solve the tridiagonal system for the second derivatives (Thomas
    /// algorithm) and convert to per-segment polynomial coefficients.
    fn compute_coefficients(x: &[f64], y: &[f64]) -> Vec<[f64; 4]> {
        let n = x.len();
        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        let mut alpha = vec![0.0; n - 1];
        for i in 1..n - 1 {
            alpha[i] = (3.0 / h[i]) * (y[i + 1] - y[i]) - (3.0 / h[i - 1]) * (y[i] - y[i - 1]);
        }

        let mut l = vec![1.0; n];
        let mut mu = vec![0.0; n];
        let mut z = vec![0.0; n];
        for i in 1..n - 1 {
            l[i] = 2.0 * (x[i + 1] - x[i - 1]) - h[i - 1] * mu[i - 1];
            mu[i] = h[i] / l[i];
            z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
        }

        let mut c = vec![0.0; n];
        let mut coeffs = vec![[0.0; 4]; n - 1];
        for j in (0..n - 1).rev() {
            c[j] = z[j] - mu[j] * c[j + 1];
            let b = (y[j + 1] - y[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
            let d = (c[j + 1] - c[j]) / (3.0 * h[j]);
            coeffs[j] = [y[j], b, c[j], d];
        }
        coeffs
    }

    /// First and last knot
    pub fn range(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    pub fn contains(&self, x: f64) -> bool {
        let (min, max) = self.range();
        x >= min && x <= max
    }

    /// Evaluate at `x`, which must lie within [`CubicSpline::range`]
    pub fn evaluate(&self, x: f64) -> Result<f64, SplineError> {
        if !self.contains(x) {
            let (min, max) = self.range();
            return Err(SplineError::OutOfRange { x, min, max });
        }
        if x == self.x[self.x.len() - 1] {
            return Ok(self.y[self.y.len() - 1]);
        }

        let segment = self.find_segment(x);
        let dx = x - self.x[segment];
        let [a, b, c, d] = self.coeffs[segment];
        Ok(a + b * dx + c * dx * dx + d * dx * dx * dx)
    }

    /// Evaluate at every point of `xs`
    pub fn evaluate_many(&self, xs: &Array1<f64>) -> Result<Array1<f64>, SplineError> {
        let values = xs
            .iter()
            .map(|&x| self.evaluate(x))
            .collect::<Result<Vec<f64>, SplineError>>()?;
        Ok(Array1::from_vec(values))
    }

    /// Index of the left knot of the segment containing x (binary search)
    fn find_segment(&self, x: f64) -> usize {
        let mut left = 0;
        let mut right = self.x.len() - 1;

        while left < right - 1 {
            let mid = (left + right) / 2;
            if x < self.x[mid] {
                right = mid;
            } else {
                left = mid;
            }
        }
        left
    }
}
