//! Error types for the detector geometry pipeline

use thiserror::Error;

/// Failures of the geometric response computation.
///
/// Row-scoped variants carry the index of the offending timestamp so the
/// caller can decide between skipping that row and aborting the batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Arm vectors d12 and d13 are collinear (or zero length), so the detector frame is undefined
    #[error("degenerate constellation at row {row}: arms are collinear (|ed13 x ed12| = {cross_norm:.3e})")]
    DegenerateGeometry { row: usize, cross_norm: f64 },

    /// The polarization angle denominator N·(L×ez) vanished
    #[error("degenerate polarization geometry at row {row}: N·(L×ez) = {denominator:.3e}")]
    DegeneratePolarization { row: usize, denominator: f64 },

    /// A direction vector had zero (or non-finite) norm before normalization
    #[error("invalid direction at row {row}: norm is {norm}")]
    InvalidDirection { row: usize, norm: f64 },

    /// Source N̂ or L̂ is unusable: zero norm, or L̂ exactly parallel to N̂
    #[error("invalid source geometry: {reason}")]
    InvalidSource { reason: String },

    /// Batched inputs disagree on their number of rows
    #[error("shape mismatch: expected {expected} rows, found {found}")]
    ShapeMismatch { expected: usize, found: usize },

    /// A batch was built from an array that is not N x 3
    #[error("expected an N x 3 array, found {columns} columns")]
    NotThreeColumns { columns: usize },
}

impl GeometryError {
    /// Row index the error refers to, if it is scoped to a single timestamp
    pub fn row(&self) -> Option<usize> {
        match self {
            GeometryError::DegenerateGeometry { row, .. }
            | GeometryError::DegeneratePolarization { row, .. }
            | GeometryError::InvalidDirection { row, .. } => Some(*row),
            GeometryError::InvalidSource { .. }
            | GeometryError::ShapeMismatch { .. }
            | GeometryError::NotThreeColumns { .. } => None,
        }
    }

    /// Re-targets a row-scoped error at a different row index.
    ///
    /// Used when a computation ran on a subset of rows and the error has to be
    /// reported against the caller's original indexing.
    pub fn with_row(self, new_row: usize) -> Self {
        match self {
            GeometryError::DegenerateGeometry { cross_norm, .. } => {
                GeometryError::DegenerateGeometry {
                    row: new_row,
                    cross_norm,
                }
            }
            GeometryError::DegeneratePolarization { denominator, .. } => {
                GeometryError::DegeneratePolarization {
                    row: new_row,
                    denominator,
                }
            }
            GeometryError::InvalidDirection { norm, .. } => GeometryError::InvalidDirection {
                row: new_row,
                norm,
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, GeometryError>;

/// Checks that two batches share a row count
pub(crate) fn check_rows(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(GeometryError::ShapeMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_accessor() {
        let err = GeometryError::DegenerateGeometry {
            row: 7,
            cross_norm: 0.0,
        };
        assert_eq!(err.row(), Some(7));

        let err = GeometryError::ShapeMismatch {
            expected: 3,
            found: 4,
        };
        assert_eq!(err.row(), None);
    }

    #[test]
    fn test_with_row_remaps_only_row_scoped_errors() {
        let err = GeometryError::DegeneratePolarization {
            row: 0,
            denominator: 0.0,
        }
        .with_row(12);
        assert_eq!(err.row(), Some(12));

        let err = GeometryError::NotThreeColumns { columns: 2 }.with_row(12);
        assert_eq!(err, GeometryError::NotThreeColumns { columns: 2 });

        let source = GeometryError::InvalidSource {
            reason: "zero norm".to_string(),
        };
        assert_eq!(source.row(), None);
        assert_eq!(source.clone().with_row(12), source);
    }

    #[test]
    fn test_check_rows() {
        assert!(check_rows(5, 5).is_ok());
        assert_eq!(
            check_rows(5, 4),
            Err(GeometryError::ShapeMismatch {
                expected: 5,
                found: 4
            })
        );
    }

    #[test]
    fn test_display_mentions_row() {
        let err = GeometryError::InvalidDirection { row: 3, norm: 0.0 };
        assert!(err.to_string().contains("row 3"));
    }
}
