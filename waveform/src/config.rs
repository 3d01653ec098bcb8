//! JSON configuration for waveform generation
//!
//! ```json
//! {
//!   "params": { "mass_bh": 1e6, "eccentricity": 0.5, "duration": 86400 },
//!   "constants": { "gravitational_constant": 6.6743e-11 }
//! }
//! ```
//!
//! Omitted fields take their defaults.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::PhysicalConstants;
use crate::params::EmriParams;
use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    pub params: EmriParams,
    pub constants: PhysicalConstants,
}

impl WaveformConfig {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "params": {{ "duration": 3600, "inclination": 1.0 }} }}"#
        )
        .unwrap();

        let config = WaveformConfig::from_json_path(file.path()).unwrap();
        assert_eq!(config.params.duration, 3600.0);
        assert_eq!(config.params.inclination, 1.0);
        assert_eq!(config.params.mass_bh, 1e6);
        assert_eq!(config.constants, PhysicalConstants::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = WaveformConfig::default();
        let json = config.to_json().unwrap();
        let parsed: WaveformConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file() {
        assert!(WaveformConfig::from_json_path("/nonexistent/waveform.json").is_err());
    }
}
