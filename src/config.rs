//! Configuration management for the back curve detector

use crate::constants::{
    BODY_COUNT, DEFAULT_DENSITY_THRESHOLD, DEFAULT_FPS, DEFAULT_HIP_OFFSET_FRACTION, DEFAULT_NEIGHBOR_COUNT,
    DEFAULT_PLOT_ROUND_FACTOR, DEFAULT_SENSOR_TILT_DEGREES, DEPTH_CX, DEPTH_CY, DEPTH_FX, DEPTH_FY, DEPTH_HEIGHT,
    DEPTH_WIDTH,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Back classification and row filtering
    pub classifier: ClassifierConfig,

    /// Depth sensor geometry
    pub sensor: SensorConfig,

    /// Curve plot viewport
    pub plot: PlotConfig,
}

/// What to do with a row none of whose candidates passes the row filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Leave the row out of the curve and keep scanning
    #[default]
    Skip,
    /// Discard the whole frame
    Abort,
}

/// Back classification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Row filter type (see `filters::create_filter`)
    pub row_filter: String,

    /// Neighbour count of the spine row filter; half of it is the forward window
    pub neighbor_count: usize,

    /// Mean depth distance (meters) below which a candidate is accepted
    pub density_threshold: f64,

    /// Rotate accepted points to compensate the sensor mount tilt
    pub adjust_for_sensor_tilt: bool,

    /// Sensor mount tilt in degrees
    pub sensor_tilt_degrees: f64,

    /// Fraction of the spine length the hip boundary is moved up by
    pub hip_offset_fraction: f64,

    /// Body-index values below this belong to a tracked player
    pub body_count: u8,

    /// Handling of rows without an accepted candidate
    pub row_policy: RowPolicy,
}

/// Depth sensor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Depth raster width
    pub width: usize,

    /// Depth raster height
    pub height: usize,

    /// Focal lengths (pixels)
    pub fx: f64,
    pub fy: f64,

    /// Principal point (pixels)
    pub cx: f64,
    pub cy: f64,

    /// Frame rate of the stream; sets the per-frame time budget
    pub fps: u32,
}

/// Curve plot parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Plot raster width
    pub width: usize,

    /// Plot raster height
    pub height: usize,

    /// Rounding step of the plotted bounds (meters)
    pub round_factor: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            row_filter: "spine".to_string(),
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            density_threshold: DEFAULT_DENSITY_THRESHOLD,
            adjust_for_sensor_tilt: true,
            sensor_tilt_degrees: DEFAULT_SENSOR_TILT_DEGREES,
            hip_offset_fraction: DEFAULT_HIP_OFFSET_FRACTION,
            body_count: BODY_COUNT,
            row_policy: RowPolicy::Skip,
        }
    }
}

impl ClassifierConfig {
    /// Validate the classification parameters
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        // Row filter parameters
        if self.neighbor_count < 2 {
            return Err(Error::ConfigError(
                "Neighbor count must be at least 2".to_string(),
            ));
        }
        if !(self.density_threshold > 0.0 && self.density_threshold.is_finite()) {
            return Err(Error::ConfigError(
                "Density threshold must be a positive number".to_string(),
            ));
        }
        if !self.sensor_tilt_degrees.is_finite() || self.sensor_tilt_degrees.abs() > 90.0 {
            return Err(Error::ConfigError(
                "Sensor tilt must be between -90 and 90 degrees".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.hip_offset_fraction) {
            return Err(Error::ConfigError(
                "Hip offset fraction must be in [0.0, 1.0)".to_string(),
            ));
        }
        if self.body_count == 0 {
            return Err(Error::ConfigError("Body count must be greater than 0".to_string()));
        }

        Ok(())
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            width: DEPTH_WIDTH,
            height: DEPTH_HEIGHT,
            fx: DEPTH_FX,
            fy: DEPTH_FY,
            cx: DEPTH_CX,
            cy: DEPTH_CY,
            fps: DEFAULT_FPS,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: DEPTH_WIDTH,
            height: DEPTH_HEIGHT,
            round_factor: DEFAULT_PLOT_ROUND_FACTOR,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        self.classifier.validate()?;

        // Sensor settings
        if self.sensor.width == 0 || self.sensor.height == 0 {
            return Err(Error::ConfigError("Sensor dimensions must be greater than 0".to_string()));
        }
        if !(self.sensor.fx > 0.0 && self.sensor.fy > 0.0) {
            return Err(Error::ConfigError("Focal lengths must be positive".to_string()));
        }
        if self.sensor.fps == 0 {
            return Err(Error::ConfigError("Sensor FPS must be greater than 0".to_string()));
        }

        // Plot settings
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(Error::ConfigError("Plot dimensions must be greater than 0".to_string()));
        }
        if !(0.0..1.0).contains(&self.plot.round_factor) {
            return Err(Error::ConfigError(
                "Plot round factor must be in [0.0, 1.0)".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Back Curve Detector Configuration

# Back classification
classifier:
  row_filter: "spine"
  neighbor_count: 12
  density_threshold: 0.005
  adjust_for_sensor_tilt: true
  sensor_tilt_degrees: -14.0
  hip_offset_fraction: 0.15
  body_count: 6
  row_policy: skip

# Depth sensor
sensor:
  width: 512
  height: 424
  fx: 365.456
  fy: 365.456
  cx: 254.878
  cy: 205.395
  fps: 30

# Curve plot
plot:
  width: 512
  height: 424
  round_factor: 0.3
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = Config::from_yaml(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed = Config::from_yaml("classifier:\n  row_policy: abort\n").unwrap();
        assert_eq!(parsed.classifier.row_policy, RowPolicy::Abort);
        assert_eq!(parsed.classifier.neighbor_count, DEFAULT_NEIGHBOR_COUNT);
        assert_eq!(parsed.sensor, SensorConfig::default());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = Config::default();
        config.classifier.neighbor_count = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.density_threshold = 0.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.classifier.hip_offset_fraction = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.sensor.fps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.plot.round_factor = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_yaml() {
        assert!(matches!(
            Config::from_yaml("classifier: [1, 2"),
            Err(Error::ConfigError(_))
        ));
        assert!(Config::from_yaml("classifier:\n  row_policy: sometimes\n").is_err());
    }
}
