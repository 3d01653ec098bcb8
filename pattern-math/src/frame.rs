//! Detector frame construction from spacecraft positions
//!
//! The detector frame is rebuilt for every timestamp from the three
//! spacecraft positions:
//!
//! 1. `d12 = P2 − P1`, `d13 = P3 − P1`
//! 2. `ex = normalize(d12 + d13)` (arm bisector)
//! 3. `ez = normalize(ed13 × ed12)` with `edij = normalize(dij)`
//! 4. `ey = ez × ex`
//!
//! The cross product order in step 3 fixes the handedness: a constellation
//! ordered counter-clockwise when seen from +z yields `ez = −ẑ`.
//!
//! `ez` is rescaled to unit length, so all three axes are unit vectors for any
//! opening angle. Without that step `|ez| = |ey| = sin(opening angle)` and the
//! frame-local source components, and hence theta and phi, would change for
//! every non-right-angled triangle.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::error::{check_rows, GeometryError, Result};
use crate::vector::{cross, normalize, Vec3Batch};

/// Minimum |ed13 × ed12| (sine of the opening angle) for a usable frame
pub const ARM_COLLINEARITY_EPSILON: f64 = 1e-10;

/// Per-timestamp positions of the three spacecraft.
///
/// Units are arbitrary but must be consistent; only differences and
/// directions enter the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SpacecraftPositions {
    sc1: Vec3Batch,
    sc2: Vec3Batch,
    sc3: Vec3Batch,
}

impl SpacecraftPositions {
    /// # Returns
    /// * `Err(GeometryError::ShapeMismatch)` - If the batches differ in length
    pub fn new(sc1: Vec3Batch, sc2: Vec3Batch, sc3: Vec3Batch) -> Result<Self> {
        check_rows(sc1.len(), sc2.len())?;
        check_rows(sc1.len(), sc3.len())?;
        Ok(Self { sc1, sc2, sc3 })
    }

    pub fn len(&self) -> usize {
        self.sc1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sc1.is_empty()
    }

    pub fn sc1(&self) -> &Vec3Batch {
        &self.sc1
    }

    pub fn sc2(&self) -> &Vec3Batch {
        &self.sc2
    }

    pub fn sc3(&self) -> &Vec3Batch {
        &self.sc3
    }

    /// Constellation centroid (guiding centre) per timestamp
    pub fn centroid(&self) -> Result<Vec3Batch> {
        Vec3Batch::mean_of(&[&self.sc1, &self.sc2, &self.sc3])
    }

    /// Arm lengths |P2−P1|, |P3−P1|, |P3−P2| per timestamp
    pub fn arm_lengths(&self) -> Vec<[f64; 3]> {
        self.sc1
            .iter()
            .zip(self.sc2.iter())
            .zip(self.sc3.iter())
            .map(|((p1, p2), p3)| [(p2 - p1).norm(), (p3 - p1).norm(), (p3 - p2).norm()])
            .collect()
    }

    /// Subset of timestamps, in the given order
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            sc1: self.sc1.select(rows),
            sc2: self.sc2.select(rows),
            sc3: self.sc3.select(rows),
        }
    }

    /// Apply one rotation to every spacecraft position
    pub fn rotated(&self, rotation: &Rotation3<f64>) -> Self {
        let rotate = |v: &Vector3<f64>| rotation * v;
        Self {
            sc1: self.sc1.map_rows(rotate),
            sc2: self.sc2.map_rows(rotate),
            sc3: self.sc3.map_rows(rotate),
        }
    }
}

/// Orthonormal right-handed detector basis, one per timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorFrame {
    ex: Vec3Batch,
    ey: Vec3Batch,
    ez: Vec3Batch,
}

/// Any failure to normalize an arm means the arm itself is degenerate
fn arm_degenerate(err: GeometryError) -> GeometryError {
    match err {
        GeometryError::InvalidDirection { row, .. } => GeometryError::DegenerateGeometry {
            row,
            cross_norm: 0.0,
        },
        other => other,
    }
}

impl DetectorFrame {
    /// Build the detector frame for every timestamp.
    ///
    /// # Returns
    /// * `Ok(DetectorFrame)` - Orthonormal frames for all rows
    /// * `Err(GeometryError::DegenerateGeometry)` - First row where the arms are
    ///   collinear or have zero length; no partial frame is returned
    pub fn from_positions(positions: &SpacecraftPositions) -> Result<Self> {
        let d12 = positions.sc2.difference(&positions.sc1)?;
        let d13 = positions.sc3.difference(&positions.sc1)?;
        let xd = d12.sum(&d13)?;

        let ed12 = normalize(&d12).map_err(arm_degenerate)?;
        let ed13 = normalize(&d13).map_err(arm_degenerate)?;

        let ez_raw = cross(&ed13, &ed12)?;
        for (row, cross_norm) in ez_raw.norms().iter().enumerate() {
            if !(*cross_norm >= ARM_COLLINEARITY_EPSILON) {
                return Err(GeometryError::DegenerateGeometry {
                    row,
                    cross_norm: *cross_norm,
                });
            }
        }

        // Non-collinear arms cannot sum to zero
        let ex = normalize(&xd).map_err(arm_degenerate)?;
        let ez = normalize(&ez_raw)?;
        let ey = cross(&ez, &ex)?;

        Ok(Self { ex, ey, ez })
    }

    pub fn len(&self) -> usize {
        self.ex.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ex.is_empty()
    }

    pub fn ex(&self) -> &Vec3Batch {
        &self.ex
    }

    pub fn ey(&self) -> &Vec3Batch {
        &self.ey
    }

    pub fn ez(&self) -> &Vec3Batch {
        &self.ez
    }

    /// Basis vectors (ex, ey, ez) for one timestamp
    pub fn axes(&self, row: usize) -> (Vector3<f64>, Vector3<f64>, Vector3<f64>) {
        (self.ex.row(row), self.ey.row(row), self.ez.row(row))
    }

    /// Matrix with rows (ex, ey, ez) for one timestamp.
    ///
    /// Multiplying a barycentric vector by this matrix yields its components
    /// in the detector frame.
    pub fn transformation_matrix(&self, row: usize) -> Matrix3<f64> {
        let (ex, ey, ez) = self.axes(row);
        Matrix3::from_rows(&[ex.transpose(), ey.transpose(), ez.transpose()])
    }

    /// [`Self::transformation_matrix`] for every timestamp
    pub fn transformation_matrices(&self) -> Vec<Matrix3<f64>> {
        (0..self.len())
            .map(|row| self.transformation_matrix(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use test_helpers::{random_rotation, taiji_like_constellation};

    fn single(p1: Vector3<f64>, p2: Vector3<f64>, p3: Vector3<f64>) -> SpacecraftPositions {
        SpacecraftPositions::new(
            Vec3Batch::from_vectors(&[p1]),
            Vec3Batch::from_vectors(&[p2]),
            Vec3Batch::from_vectors(&[p3]),
        )
        .unwrap()
    }

    fn positions_from_arrays(arrays: [ndarray::Array2<f64>; 3]) -> SpacecraftPositions {
        let [a, b, c] = arrays;
        SpacecraftPositions::new(
            Vec3Batch::new(a).unwrap(),
            Vec3Batch::new(b).unwrap(),
            Vec3Batch::new(c).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_equilateral_xy_plane_gives_negative_z() {
        let positions = single(
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.5, 3f64.sqrt() / 2.0, 0.0),
        );
        let frame = DetectorFrame::from_positions(&positions).unwrap();
        let (ex, ey, ez) = frame.axes(0);

        assert_relative_eq!(ez, Vector3::new(0.0, 0.0, -1.0), epsilon = 1e-12);
        assert_relative_eq!(ex, Vector3::new(3f64.sqrt() / 2.0, 0.5, 0.0), epsilon = 1e-12);
        assert_relative_eq!(ey, ez.cross(&ex), epsilon = 1e-12);
    }

    #[test]
    fn test_swapping_spacecraft_flips_z() {
        let positions = single(
            Vector3::zeros(),
            Vector3::new(0.5, 3f64.sqrt() / 2.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        );
        let frame = DetectorFrame::from_positions(&positions).unwrap();
        assert_relative_eq!(frame.ez().row(0), Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_orthonormal_right_handed_along_orbit() {
        let positions = positions_from_arrays(taiji_like_constellation(365, 1.0));
        let frame = DetectorFrame::from_positions(&positions).unwrap();
        assert_eq!(frame.len(), 365);

        for row in 0..frame.len() {
            let (ex, ey, ez) = frame.axes(row);
            assert_relative_eq!(ex.dot(&ey), 0.0, epsilon = 1e-9);
            assert_relative_eq!(ex.dot(&ez), 0.0, epsilon = 1e-9);
            assert_relative_eq!(ey.dot(&ez), 0.0, epsilon = 1e-9);
            assert_relative_eq!(ex.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(ey.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(ez.norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(ez, ex.cross(&ey), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_frame_rotates_with_constellation() {
        let positions = positions_from_arrays(taiji_like_constellation(30, 1.0));
        let rotation = random_rotation(99);
        let frame = DetectorFrame::from_positions(&positions).unwrap();
        let rotated = DetectorFrame::from_positions(&positions.rotated(&rotation)).unwrap();

        for row in 0..frame.len() {
            let (ex, ey, ez) = frame.axes(row);
            let (rx, ry, rz) = rotated.axes(row);
            assert_relative_eq!(rotation * ex, rx, epsilon = 1e-9);
            assert_relative_eq!(rotation * ey, ry, epsilon = 1e-9);
            assert_relative_eq!(rotation * ez, rz, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_collinear_arms_are_degenerate() {
        let positions = SpacecraftPositions::new(
            Vec3Batch::from_vectors(&[Vector3::zeros(), Vector3::zeros()]),
            Vec3Batch::from_vectors(&[Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)]),
            Vec3Batch::from_vectors(&[Vector3::new(0.0, 1.0, 0.0), Vector3::new(2.0, 0.0, 0.0)]),
        )
        .unwrap();

        let err = DetectorFrame::from_positions(&positions).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::DegenerateGeometry { row: 1, .. }
        ));
    }

    #[test]
    fn test_anti_parallel_arms_are_degenerate() {
        let positions = single(
            Vector3::zeros(),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
        );
        assert!(matches!(
            DetectorFrame::from_positions(&positions),
            Err(GeometryError::DegenerateGeometry { row: 0, .. })
        ));
    }

    #[test]
    fn test_coincident_spacecraft_are_degenerate() {
        let positions = single(Vector3::zeros(), Vector3::zeros(), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(
            DetectorFrame::from_positions(&positions).unwrap_err(),
            GeometryError::DegenerateGeometry {
                row: 0,
                cross_norm: 0.0
            }
        );
    }

    #[test]
    fn test_mismatched_spacecraft_batches() {
        let err = SpacecraftPositions::new(
            Vec3Batch::from_vectors(&[Vector3::zeros()]),
            Vec3Batch::from_vectors(&[Vector3::zeros(), Vector3::zeros()]),
            Vec3Batch::from_vectors(&[Vector3::zeros()]),
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_transformation_matrix_projects_onto_axes() {
        let positions = positions_from_arrays(taiji_like_constellation(5, 1.0));
        let frame = DetectorFrame::from_positions(&positions).unwrap();
        let v = Vector3::new(0.3, -0.4, 0.5);

        for (row, m) in frame.transformation_matrices().iter().enumerate() {
            let (ex, ey, ez) = frame.axes(row);
            let local = m * v;
            assert_relative_eq!(local.x, ex.dot(&v), epsilon = 1e-15);
            assert_relative_eq!(local.y, ey.dot(&v), epsilon = 1e-15);
            assert_relative_eq!(local.z, ez.dot(&v), epsilon = 1e-15);
        }
    }

    #[test]
    fn test_centroid_and_arm_lengths() {
        let positions = single(
            Vector3::zeros(),
            Vector3::new(3.0, 0.0, 0.0),
            Vector3::new(0.0, 4.0, 0.0),
        );
        assert_relative_eq!(positions.centroid().unwrap().row(0), Vector3::new(1.0, 4.0 / 3.0, 0.0));
        assert_eq!(positions.arm_lengths()[0], [3.0, 4.0, 5.0]);
    }
}
