//! Batched 3-vector algebra
//!
//! A [`Vec3Batch`] stores one three-component vector per timestamp as an
//! `N × 3` array. Every binary operation validates that both operands carry
//! the same number of rows before touching the data, so misaligned time
//! series fail with [`GeometryError::ShapeMismatch`] instead of broadcasting.
//!
//! Fixed vectors (the source direction, the orbital angular momentum) are
//! plain nalgebra [`Vector3`]s. Combining one with a batch goes through an
//! explicit `*_fixed` function or [`Vec3Batch::broadcast`].

use nalgebra::{Unit, Vector3};
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};

use crate::error::{check_rows, GeometryError, Result};

/// An ordered sequence of 3-vectors, one per timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct Vec3Batch {
    data: Array2<f64>,
}

impl Vec3Batch {
    /// Wrap an `N × 3` array
    ///
    /// # Returns
    /// * `Err(GeometryError::NotThreeColumns)` - If the array does not have exactly 3 columns
    pub fn new(data: Array2<f64>) -> Result<Self> {
        if data.ncols() != 3 {
            return Err(GeometryError::NotThreeColumns {
                columns: data.ncols(),
            });
        }
        Ok(Self { data })
    }

    /// Build a batch from three equally long component columns
    pub fn from_columns(x: &[f64], y: &[f64], z: &[f64]) -> Result<Self> {
        check_rows(x.len(), y.len())?;
        check_rows(x.len(), z.len())?;

        let mut data = Array2::zeros((x.len(), 3));
        for (i, mut row) in data.axis_iter_mut(Axis(0)).enumerate() {
            row[0] = x[i];
            row[1] = y[i];
            row[2] = z[i];
        }
        Ok(Self { data })
    }

    /// Build a batch from three equally long component arrays
    pub fn from_component_arrays(x: &Array1<f64>, y: &Array1<f64>, z: &Array1<f64>) -> Result<Self> {
        check_rows(x.len(), y.len())?;
        check_rows(x.len(), z.len())?;

        let mut data = Array2::zeros((x.len(), 3));
        Zip::from(data.rows_mut())
            .and(x)
            .and(y)
            .and(z)
            .for_each(|mut row, &x, &y, &z| {
                row[0] = x;
                row[1] = y;
                row[2] = z;
            });
        Ok(Self { data })
    }

    /// Build a batch from a slice of nalgebra vectors
    pub fn from_vectors(vectors: &[Vector3<f64>]) -> Self {
        let mut data = Array2::zeros((vectors.len(), 3));
        for (mut row, v) in data.axis_iter_mut(Axis(0)).zip(vectors) {
            row[0] = v.x;
            row[1] = v.y;
            row[2] = v.z;
        }
        Self { data }
    }

    /// Repeat a single vector `rows` times.
    ///
    /// This is the explicit form of the broadcasting a fixed source vector
    /// undergoes when it meets a per-timestamp batch.
    pub fn broadcast(v: &Vector3<f64>, rows: usize) -> Self {
        let mut data = Array2::zeros((rows, 3));
        for mut row in data.axis_iter_mut(Axis(0)) {
            row[0] = v.x;
            row[1] = v.y;
            row[2] = v.z;
        }
        Self { data }
    }

    /// Number of rows (timestamps)
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Row `index` as an nalgebra vector
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn row(&self, index: usize) -> Vector3<f64> {
        let r = self.data.row(index);
        Vector3::new(r[0], r[1], r[2])
    }

    /// Iterate over rows as nalgebra vectors
    pub fn iter(&self) -> impl Iterator<Item = Vector3<f64>> + '_ {
        self.data
            .axis_iter(Axis(0))
            .map(|r| Vector3::new(r[0], r[1], r[2]))
    }

    /// One component (0 = x, 1 = y, 2 = z) across all rows
    pub fn component(&self, axis: usize) -> ArrayView1<'_, f64> {
        self.data.column(axis)
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Row-wise `self - other`
    pub fn difference(&self, other: &Vec3Batch) -> Result<Vec3Batch> {
        check_rows(self.len(), other.len())?;
        Ok(Self {
            data: &self.data - &other.data,
        })
    }

    /// Row-wise `self + other`
    pub fn sum(&self, other: &Vec3Batch) -> Result<Vec3Batch> {
        check_rows(self.len(), other.len())?;
        Ok(Self {
            data: &self.data + &other.data,
        })
    }

    /// Row-wise arithmetic mean of several equally long batches
    pub fn mean_of(batches: &[&Vec3Batch]) -> Result<Vec3Batch> {
        let Some(first) = batches.first() else {
            return Ok(Self {
                data: Array2::zeros((0, 3)),
            });
        };

        let mut acc = first.data.clone();
        for batch in &batches[1..] {
            check_rows(first.len(), batch.len())?;
            acc += &batch.data;
        }
        acc /= batches.len() as f64;
        Ok(Self { data: acc })
    }

    /// Euclidean norm of each row
    pub fn norms(&self) -> Array1<f64> {
        self.data
            .map_axis(Axis(1), |r| (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt())
    }

    /// Apply a vector-valued function to every row
    pub fn map_rows<F>(&self, f: F) -> Vec3Batch
    where
        F: Fn(&Vector3<f64>) -> Vector3<f64>,
    {
        let mapped: Vec<Vector3<f64>> = self.iter().map(|v| f(&v)).collect();
        Self::from_vectors(&mapped)
    }

    /// Keep only the listed rows, in the given order
    ///
    /// # Panics
    /// If any index is out of bounds.
    pub fn select(&self, rows: &[usize]) -> Vec3Batch {
        Self {
            data: self.data.select(Axis(0), rows),
        }
    }
}

/// Batched cross product `a × b`.
///
/// Standard Levi-Civita contraction per row:
/// `c = (a_y b_z − a_z b_y, a_z b_x − a_x b_z, a_x b_y − a_y b_x)`.
pub fn cross(a: &Vec3Batch, b: &Vec3Batch) -> Result<Vec3Batch> {
    check_rows(a.len(), b.len())?;

    let mut out = Array2::zeros((a.len(), 3));
    Zip::from(out.rows_mut())
        .and(a.data.rows())
        .and(b.data.rows())
        .for_each(|mut c, a, b| {
            c[0] = a[1] * b[2] - a[2] * b[1];
            c[1] = a[2] * b[0] - a[0] * b[2];
            c[2] = a[0] * b[1] - a[1] * b[0];
        });
    Ok(Vec3Batch { data: out })
}

/// Batched inner product, one scalar per row
pub fn dot(a: &Vec3Batch, b: &Vec3Batch) -> Result<Array1<f64>> {
    check_rows(a.len(), b.len())?;

    let mut out = Array1::zeros(a.len());
    Zip::from(&mut out)
        .and(a.data.rows())
        .and(b.data.rows())
        .for_each(|d, a, b| *d = a[0] * b[0] + a[1] * b[1] + a[2] * b[2]);
    Ok(out)
}

/// Inner product of every row with one fixed vector
pub fn dot_fixed(a: &Vec3Batch, v: &Vector3<f64>) -> Array1<f64> {
    a.data
        .rows()
        .into_iter()
        .map(|r| r[0] * v.x + r[1] * v.y + r[2] * v.z)
        .collect()
}

/// Scale every row to unit length.
///
/// # Returns
/// * `Err(GeometryError::InvalidDirection)` - For the first row whose norm is
///   zero or not finite. Such rows are never silently replaced.
pub fn normalize(v: &Vec3Batch) -> Result<Vec3Batch> {
    let mut out = v.data.clone();
    for (row, mut r) in out.axis_iter_mut(Axis(0)).enumerate() {
        let norm = (r[0] * r[0] + r[1] * r[1] + r[2] * r[2]).sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(GeometryError::InvalidDirection { row, norm });
        }
        r /= norm;
    }
    Ok(Vec3Batch { data: out })
}

/// Normalize a single fixed vector, reporting a zero norm as row 0
pub fn normalize_vector(v: &Vector3<f64>) -> Result<Unit<Vector3<f64>>> {
    let norm = v.norm();
    if norm == 0.0 || !norm.is_finite() {
        return Err(GeometryError::InvalidDirection { row: 0, norm });
    }
    Ok(Unit::new_unchecked(v / norm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::sky::random_unit_vectors;

    fn batch(rows: &[[f64; 3]]) -> Vec3Batch {
        let vectors: Vec<Vector3<f64>> = rows.iter().map(|r| Vector3::new(r[0], r[1], r[2])).collect();
        Vec3Batch::from_vectors(&vectors)
    }

    #[test]
    fn test_new_rejects_wrong_column_count() {
        let err = Vec3Batch::new(Array2::zeros((4, 2))).unwrap_err();
        assert_eq!(err, GeometryError::NotThreeColumns { columns: 2 });
    }

    #[test]
    fn test_from_columns_layout() {
        let b = Vec3Batch::from_columns(&[1.0, 4.0], &[2.0, 5.0], &[3.0, 6.0]).unwrap();
        assert_eq!(b.as_array(), &array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_from_columns_mismatch() {
        let err = Vec3Batch::from_columns(&[1.0, 2.0], &[1.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::ShapeMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_cross_basis_handedness() {
        let x = batch(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let y = batch(&[[0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]]);
        let c = cross(&x, &y).unwrap();

        assert_eq!(c.row(0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(c.row(1), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(c.row(2), Vector3::new(0.0, 1.0, 0.0));

        let reversed = cross(&y, &x).unwrap();
        assert_eq!(reversed.row(0), Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_cross_matches_nalgebra() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = random_unit_vectors(&mut rng, 50);
        let b = random_unit_vectors(&mut rng, 50);
        let c = cross(&a, &b).unwrap();

        for i in 0..50 {
            let expected = a.row(i).cross(&b.row(i));
            assert_relative_eq!(c.row(i), expected, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_cross_shape_mismatch() {
        let a = batch(&[[1.0, 0.0, 0.0]]);
        let b = batch(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert!(matches!(
            cross(&a, &b),
            Err(GeometryError::ShapeMismatch { .. })
        ));
        assert!(matches!(dot(&a, &b), Err(GeometryError::ShapeMismatch { .. })));
        assert!(matches!(
            a.difference(&b),
            Err(GeometryError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_dot_and_dot_fixed_agree() {
        let a = batch(&[[1.0, 2.0, 3.0], [-1.0, 0.5, 2.0]]);
        let v = Vector3::new(0.5, -1.0, 2.0);
        let fixed = dot_fixed(&a, &v);
        let broadcast = dot(&a, &Vec3Batch::broadcast(&v, 2)).unwrap();

        assert_eq!(fixed, broadcast);
        assert_relative_eq!(fixed[0], 4.5);
        assert_relative_eq!(fixed[1], 3.0);
    }

    #[test]
    fn test_normalize_unit_vectors_properties() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = random_unit_vectors(&mut rng, 200);
        let n = normalize(&a).unwrap();
        let projections = dot(&a, &n).unwrap();

        for (norm, proj) in n.norms().iter().zip(projections.iter()) {
            assert_relative_eq!(*norm, 1.0, epsilon = 1e-12);
            assert_relative_eq!(*proj, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_normalize_rejects_zero_row() {
        let a = batch(&[[3.0, 4.0, 0.0], [0.0, 0.0, 0.0]]);
        let err = normalize(&a).unwrap_err();
        assert_eq!(err, GeometryError::InvalidDirection { row: 1, norm: 0.0 });
    }

    #[test]
    fn test_normalize_vector_zero() {
        assert!(normalize_vector(&Vector3::zeros()).is_err());
        let u = normalize_vector(&Vector3::new(0.0, 3.0, 4.0)).unwrap();
        assert_relative_eq!(u.into_inner(), Vector3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_mean_of_three() {
        let a = batch(&[[3.0, 0.0, 0.0]]);
        let b = batch(&[[0.0, 3.0, 0.0]]);
        let c = batch(&[[0.0, 0.0, 3.0]]);
        let m = Vec3Batch::mean_of(&[&a, &b, &c]).unwrap();
        assert_relative_eq!(m.row(0), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn test_select_and_norms() {
        let a = batch(&[[3.0, 4.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 2.0]]);
        let s = a.select(&[2, 0]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.norms(), array![2.0, 5.0]);
    }
}
