//! Orbit tables loaded from ephemeris CSV files
//!
//! The file format is one row per timestamp with the columns
//!
//! ```text
//! timeJD, sunPX, sunPY, sunPZ, earthPX, earthPY, earthPZ,
//! scp1X, scp1Y, scp1Z, scp2X, scp2Y, scp2Z, scp3X, scp3Y, scp3Z
//! ```
//!
//! A leading unnamed index column (as written by pandas) is ignored. Positions
//! may be in any length unit as long as it is the same for every column.

use std::io::{Read, Write};
use std::path::Path;

use log::{debug, info};
use ndarray::{Array1, Axis};
use pattern_math::{
    cartesian_to_theta_phi, normalize, AngleUnit, SpacecraftPositions, ThetaPhi, Vec3Batch,
};
use serde::{Deserialize, Serialize};

use crate::{EphemerisError, Result};

/// One row of an orbit CSV file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitRecord {
    #[serde(rename = "timeJD")]
    pub time_jd: f64,
    #[serde(rename = "sunPX")]
    pub sun_x: f64,
    #[serde(rename = "sunPY")]
    pub sun_y: f64,
    #[serde(rename = "sunPZ")]
    pub sun_z: f64,
    #[serde(rename = "earthPX")]
    pub earth_x: f64,
    #[serde(rename = "earthPY")]
    pub earth_y: f64,
    #[serde(rename = "earthPZ")]
    pub earth_z: f64,
    #[serde(rename = "scp1X")]
    pub sc1_x: f64,
    #[serde(rename = "scp1Y")]
    pub sc1_y: f64,
    #[serde(rename = "scp1Z")]
    pub sc1_z: f64,
    #[serde(rename = "scp2X")]
    pub sc2_x: f64,
    #[serde(rename = "scp2Y")]
    pub sc2_y: f64,
    #[serde(rename = "scp2Z")]
    pub sc2_z: f64,
    #[serde(rename = "scp3X")]
    pub sc3_x: f64,
    #[serde(rename = "scp3Y")]
    pub sc3_y: f64,
    #[serde(rename = "scp3Z")]
    pub sc3_z: f64,
}

impl OrbitRecord {
    /// Column names in file order, excluding the index column
    pub const COLUMNS: [&'static str; 16] = [
        "timeJD", "sunPX", "sunPY", "sunPZ", "earthPX", "earthPY", "earthPZ", "scp1X", "scp1Y",
        "scp1Z", "scp2X", "scp2Y", "scp2Z", "scp3X", "scp3Y", "scp3Z",
    ];

    /// Values in the order of [`OrbitRecord::COLUMNS`]
    pub fn values(&self) -> [f64; 16] {
        [
            self.time_jd,
            self.sun_x,
            self.sun_y,
            self.sun_z,
            self.earth_x,
            self.earth_y,
            self.earth_z,
            self.sc1_x,
            self.sc1_y,
            self.sc1_z,
            self.sc2_x,
            self.sc2_y,
            self.sc2_z,
            self.sc3_x,
            self.sc3_y,
            self.sc3_z,
        ]
    }

    fn first_non_finite(&self) -> Option<&'static str> {
        Self::COLUMNS
            .iter()
            .zip(self.values())
            .find(|(_, v)| !v.is_finite())
            .map(|(name, _)| *name)
    }
}

/// Per-timestamp positions of the Sun, the Earth and the three spacecraft
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitTable {
    /// Julian dates, strictly increasing
    pub time_jd: Array1<f64>,
    pub sun: Vec3Batch,
    pub earth: Vec3Batch,
    pub positions: SpacecraftPositions,
}

impl OrbitTable {
    /// Load an orbit table from a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::Reader::from_path(path)?;
        let table = Self::from_csv(reader)?;
        info!(
            "Loaded {} orbit rows from {} (JD {:.3} to {:.3})",
            table.len(),
            path.display(),
            table.time_jd[0],
            table.time_jd[table.len() - 1]
        );
        Ok(table)
    }

    /// Load an orbit table from any CSV source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_csv(csv::Reader::from_reader(reader))
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: OrbitRecord = result?;
            records.push(record);
        }
        Self::from_records(&records)
    }

    /// Build a table from parsed rows.
    ///
    /// # Returns
    /// * `Err(EphemerisError::Empty)` - If there are no rows
    /// * `Err(EphemerisError::NonFinite)` - First NaN or infinite value
    /// * `Err(EphemerisError::NonMonotonicTime)` - If time does not strictly increase
    pub fn from_records(records: &[OrbitRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(EphemerisError::Empty);
        }

        for (row, record) in records.iter().enumerate() {
            if let Some(column) = record.first_non_finite() {
                return Err(EphemerisError::NonFinite { row, column });
            }
        }

        for (row, pair) in records.windows(2).enumerate() {
            if pair[1].time_jd <= pair[0].time_jd {
                return Err(EphemerisError::NonMonotonicTime {
                    row: row + 1,
                    previous: pair[0].time_jd,
                    current: pair[1].time_jd,
                });
            }
        }

        let column = |f: fn(&OrbitRecord) -> f64| records.iter().map(f).collect::<Vec<f64>>();
        let triple = |x: fn(&OrbitRecord) -> f64,
                      y: fn(&OrbitRecord) -> f64,
                      z: fn(&OrbitRecord) -> f64| {
            Vec3Batch::from_columns(&column(x), &column(y), &column(z))
        };

        let sun = triple(|r| r.sun_x, |r| r.sun_y, |r| r.sun_z)?;
        let earth = triple(|r| r.earth_x, |r| r.earth_y, |r| r.earth_z)?;
        let positions = SpacecraftPositions::new(
            triple(|r| r.sc1_x, |r| r.sc1_y, |r| r.sc1_z)?,
            triple(|r| r.sc2_x, |r| r.sc2_y, |r| r.sc2_z)?,
            triple(|r| r.sc3_x, |r| r.sc3_y, |r| r.sc3_z)?,
        )?;

        debug!("Built orbit table with {} rows", records.len());

        Ok(Self {
            time_jd: Array1::from_vec(column(|r| r.time_jd)),
            sun,
            earth,
            positions,
        })
    }

    pub fn len(&self) -> usize {
        self.time_jd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_jd.is_empty()
    }

    /// Row `index` as a CSV record
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn record(&self, index: usize) -> OrbitRecord {
        let sun = self.sun.row(index);
        let earth = self.earth.row(index);
        let p1 = self.positions.sc1().row(index);
        let p2 = self.positions.sc2().row(index);
        let p3 = self.positions.sc3().row(index);
        OrbitRecord {
            time_jd: self.time_jd[index],
            sun_x: sun.x,
            sun_y: sun.y,
            sun_z: sun.z,
            earth_x: earth.x,
            earth_y: earth.y,
            earth_z: earth.z,
            sc1_x: p1.x,
            sc1_y: p1.y,
            sc1_z: p1.z,
            sc2_x: p2.x,
            sc2_y: p2.y,
            sc2_z: p2.z,
            sc3_x: p3.x,
            sc3_y: p3.y,
            sc3_z: p3.z,
        }
    }

    /// Rows `start..=end`, with `end` clamped to the last row.
    ///
    /// # Returns
    /// * `Err(EphemerisError::InvalidWindow)` - If `start` is past the end of
    ///   the table or after `end`
    pub fn window(&self, start: usize, end: usize) -> Result<Self> {
        if start >= self.len() || start > end {
            return Err(EphemerisError::InvalidWindow {
                start,
                end,
                len: self.len(),
            });
        }
        let end = end.min(self.len() - 1);
        let rows: Vec<usize> = (start..=end).collect();

        Ok(Self {
            time_jd: self.time_jd.select(Axis(0), &rows),
            sun: self.sun.select(&rows),
            earth: self.earth.select(&rows),
            positions: self.positions.select(&rows),
        })
    }

    /// Guiding centre of the constellation (mean of the three spacecraft)
    pub fn constellation_center(&self) -> Result<Vec3Batch> {
        Ok(self.positions.centroid()?)
    }

    /// Arm lengths |P2−P1|, |P3−P1|, |P3−P2| per row
    pub fn arm_lengths(&self) -> Vec<[f64; 3]> {
        self.positions.arm_lengths()
    }

    /// Direction of the guiding centre as seen from the Sun, in degrees
    pub fn center_sky_position(&self) -> Result<ThetaPhi> {
        let heliocentric = self.constellation_center()?.difference(&self.sun)?;
        Ok(cartesian_to_theta_phi(
            &normalize(&heliocentric)?,
            AngleUnit::Degrees,
        )?)
    }

    /// Write the table in the CSV layout [`OrbitTable::from_reader`] reads,
    /// with a leading index column.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let mut header = vec![""];
        header.extend(OrbitRecord::COLUMNS);
        writer.write_record(&header)?;

        for index in 0..self.len() {
            let mut fields = vec![index.to_string()];
            fields.extend(self.record(index).values().iter().map(|v| format!("{v:?}")));
            writer.write_record(&fields)?;
        }

        writer.flush()?;
        Ok(())
    }
}
