//! Sampled waveform time series
//!
//! CSV layout, with an optional leading unnamed index column:
//!
//! ```text
//! ,timeSecond,hp,hc
//! 0,0.0,1.2e-22,-3.4e-23
//! ```

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use log::info;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::{Result, WaveformError};

/// One row of a waveform CSV file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformRecord {
    #[serde(rename = "timeSecond")]
    pub time: f64,
    #[serde(rename = "hp")]
    pub h_plus: f64,
    #[serde(rename = "hc")]
    pub h_cross: f64,
}

/// Plus and cross polarizations sampled at strictly increasing times (s)
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    time: Array1<f64>,
    h_plus: Array1<f64>,
    h_cross: Array1<f64>,
}

impl Waveform {
    /// # Returns
    /// * `Err(WaveformError::ShapeMismatch)` - If the three arrays differ in length
    /// * `Err(WaveformError::Empty)` - If there are no samples
    /// * `Err(WaveformError::NonMonotonicTime)` - If time does not strictly increase
    pub fn new(time: Array1<f64>, h_plus: Array1<f64>, h_cross: Array1<f64>) -> Result<Self> {
        for found in [h_plus.len(), h_cross.len()] {
            if found != time.len() {
                return Err(WaveformError::ShapeMismatch {
                    expected: time.len(),
                    found,
                });
            }
        }
        if time.is_empty() {
            return Err(WaveformError::Empty);
        }
        if let Some(row) = (1..time.len()).find(|&i| !(time[i] > time[i - 1])) {
            return Err(WaveformError::NonMonotonicTime { row });
        }

        Ok(Self {
            time,
            h_plus,
            h_cross,
        })
    }

    pub fn from_records(records: &[WaveformRecord]) -> Result<Self> {
        Self::new(
            records.iter().map(|r| r.time).collect(),
            records.iter().map(|r| r.h_plus).collect(),
            records.iter().map(|r| r.h_cross).collect(),
        )
    }

    pub fn time(&self) -> &Array1<f64> {
        &self.time
    }

    pub fn h_plus(&self) -> &Array1<f64> {
        &self.h_plus
    }

    pub fn h_cross(&self) -> &Array1<f64> {
        &self.h_cross
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time of the first and last sample
    pub fn span(&self) -> (f64, f64) {
        (self.time[0], self.time[self.len() - 1])
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        for result in reader.deserialize() {
            let record: WaveformRecord = result?;
            records.push(record);
        }
        Self::from_records(&records)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let waveform = Self::from_reader(File::open(path.as_ref())?)?;
        info!(
            "Loaded {} waveform samples from {}",
            waveform.len(),
            path.as_ref().display()
        );
        Ok(waveform)
    }

    /// Write `,timeSecond,hp,hc` rows with a leading index column
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(["", "timeSecond", "hp", "hc"])?;
        for i in 0..self.len() {
            writer.write_record(&[
                i.to_string(),
                format!("{:?}", self.time[i]),
                format!("{:?}", self.h_plus[i]),
                format!("{:?}", self.h_cross[i]),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lengths_must_match() {
        let err = Waveform::new(
            Array1::linspace(0.0, 1.0, 3),
            Array1::zeros(3),
            Array1::zeros(2),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            WaveformError::ShapeMismatch {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_time_must_increase() {
        let time = Array1::from_vec(vec![0.0, 4.0, 4.0, 8.0]);
        let err = Waveform::new(time, Array1::zeros(4), Array1::zeros(4)).unwrap_err();
        assert!(matches!(err, WaveformError::NonMonotonicTime { row: 2 }));
    }

    #[test]
    fn test_empty_rejected() {
        let err = Waveform::new(Array1::zeros(0), Array1::zeros(0), Array1::zeros(0)).unwrap_err();
        assert!(matches!(err, WaveformError::Empty));
    }

    #[test]
    fn test_reads_pandas_output() {
        let text = ",timeSecond,hp,hc\n0,0.0,1e-22,2e-22\n1,4.0,-1e-22,0.0\n";
        let w = Waveform::from_reader(Cursor::new(text)).unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w.span(), (0.0, 4.0));
        assert_eq!(w.h_cross()[0], 2e-22);
    }

    #[test]
    fn test_file_round_trip() {
        let time = Array1::linspace(0.0, 40.0, 11);
        let h_plus = time.mapv(|t: f64| 1e-21 * (0.3 * t).cos());
        let h_cross = time.mapv(|t: f64| 1e-21 * (0.3 * t).sin());
        let waveform = Waveform::new(time, h_plus, h_cross).unwrap();

        let file = tempfile::NamedTempFile::new().unwrap();
        waveform.write_csv_path(file.path()).unwrap();
        let loaded = Waveform::from_csv_path(file.path()).unwrap();
        assert_eq!(loaded, waveform);
    }
}
