//! Detector Configuration
//!
//! ## Overview
//!
//! A detector is built once from a [`DetectorConfig`]: the calibration table
//! plus four scalars. The configuration is validated in full before any
//! detector state exists, so an unusable deployment file fails at startup and
//! never at query time.
//!
//! ## Deployment Document
//!
//! With the `serde` feature the configuration can be loaded from the same
//! document layout the calibration tooling writes. Delta calibration:
//!
//! ```json
//! {
//!   "reference_floor": 0,
//!   "floor_measurements": [
//!     { "floor_number": 0, "mean_pressure_diff": 0.0 },
//!     { "floor_number": 1, "mean_pressure_diff": -0.42 }
//!   ],
//!   "pressure_diff_tolerance": 0.1,
//!   "redundant_measurement_count": 4,
//!   "filter_window_size": 5
//! }
//! ```
//!
//! Range calibration replaces `floor_measurements` with `floor_ranges`
//! (`floor_number`, `min_pressure`, `max_pressure`). A document carrying both
//! tables is rejected. Omitted scalars fall back to the defaults in
//! [`constants::detector`](crate::constants::detector).
//!
//! ## Usage Example
//!
//! ```rust
//! use floorguard_core::{DetectorConfig, FloorCalibration};
//!
//! let config = DetectorConfig::new(FloorCalibration::delta(0, &[(0, 0.0), (1, -0.42)])?)
//!     .with_tolerance(0.1)
//!     .with_redundant_count(4)
//!     .with_window_size(7);
//!
//! assert!(config.validate().is_ok());
//! # Ok::<(), floorguard_core::DetectorError>(())
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    calibration::FloorCalibration,
    constants::{
        buffers::{MAX_FILTER_WINDOW_SIZE, MAX_REDUNDANT_SENSORS},
        detector::{
            DEFAULT_FILTER_WINDOW_SIZE, DEFAULT_INITIAL_FLOOR, DEFAULT_PRESSURE_DIFF_TOLERANCE,
            DEFAULT_REDUNDANT_MEASUREMENT_COUNT,
        },
    },
    errors::{DetectorError, DetectorResult},
    traits::Validatable,
    Floor,
};

#[cfg(feature = "serde")]
use crate::{
    calibration::{DeltaTable, RangeTable},
    constants::detector::DEFAULT_REFERENCE_FLOOR,
};

/// Static detector configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Per-floor calibration, delta or range based
    pub calibration: FloorCalibration,

    /// Allowed deviation from a calibrated pressure difference
    pub pressure_diff_tolerance: f32,

    /// Number of redundant pressure sensors reporting in each batch
    pub redundant_measurement_count: usize,

    /// Median filter window size in readings
    pub filter_window_size: usize,

    /// Floor reported until a floor is detected or set
    pub initial_floor: Floor,

    /// Re-anchor on every delta match, not only on floor changes
    pub track_drift: bool,
}

impl DetectorConfig {
    /// Configuration with default scalars for the given calibration
    pub fn new(calibration: FloorCalibration) -> Self {
        Self {
            calibration,
            pressure_diff_tolerance: DEFAULT_PRESSURE_DIFF_TOLERANCE,
            redundant_measurement_count: DEFAULT_REDUNDANT_MEASUREMENT_COUNT,
            filter_window_size: DEFAULT_FILTER_WINDOW_SIZE,
            initial_floor: DEFAULT_INITIAL_FLOOR,
            track_drift: false,
        }
    }

    /// Set the match tolerance
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.pressure_diff_tolerance = tolerance;
        self
    }

    /// Set the number of redundant sensors
    pub fn with_redundant_count(mut self, count: usize) -> Self {
        self.redundant_measurement_count = count;
        self
    }

    /// Set the median filter window size
    pub fn with_window_size(mut self, size: usize) -> Self {
        self.filter_window_size = size;
        self
    }

    /// Set the floor reported before any detection
    pub fn with_initial_floor(mut self, floor: Floor) -> Self {
        self.initial_floor = floor;
        self
    }

    /// Enable or disable re-anchoring on every delta match
    pub fn with_drift_tracking(mut self, enabled: bool) -> Self {
        self.track_drift = enabled;
        self
    }

    /// Check every parameter and the calibration table
    pub fn validate(&self) -> DetectorResult<()> {
        self.calibration.validate()?;

        if self.redundant_measurement_count < 1 {
            return Err(DetectorError::Configuration {
                reason: "redundant measurement count must be at least 1",
            });
        }
        if self.redundant_measurement_count > MAX_REDUNDANT_SENSORS {
            return Err(DetectorError::Configuration {
                reason: "redundant measurement count exceeds MAX_REDUNDANT_SENSORS",
            });
        }
        if self.filter_window_size < 1 {
            return Err(DetectorError::Configuration {
                reason: "filter window size must be at least 1",
            });
        }
        if self.filter_window_size > MAX_FILTER_WINDOW_SIZE {
            return Err(DetectorError::Configuration {
                reason: "filter window size exceeds MAX_FILTER_WINDOW_SIZE",
            });
        }
        if !self.pressure_diff_tolerance.is_valid() || self.pressure_diff_tolerance < 0.0 {
            return Err(DetectorError::Configuration {
                reason: "pressure difference tolerance must be finite and non-negative",
            });
        }

        Ok(())
    }

    /// Parse and validate a JSON deployment document
    #[cfg(feature = "serde_json")]
    pub fn from_json_str(json: &str) -> DetectorResult<Self> {
        let document: ConfigDocument = serde_json::from_str(json).map_err(|_err| {
            log_warn!("Failed to parse detector configuration: {}", _err);
            DetectorError::Configuration {
                reason: "malformed configuration document",
            }
        })?;
        document.into_config()
    }
}

/// On-disk layout of a detector configuration
#[cfg(feature = "serde")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Reference floor for `floor_measurements`
    #[serde(default = "default_reference_floor")]
    pub reference_floor: Floor,

    /// Delta calibration entries
    #[serde(default)]
    pub floor_measurements: DeltaTable,

    /// Range calibration entries
    #[serde(default)]
    pub floor_ranges: RangeTable,

    /// Allowed deviation from a calibrated pressure difference
    #[serde(default = "default_tolerance")]
    pub pressure_diff_tolerance: f32,

    /// Number of redundant pressure sensors
    #[serde(default = "default_redundant_count")]
    pub redundant_measurement_count: usize,

    /// Median filter window size
    #[serde(default = "default_window_size")]
    pub filter_window_size: usize,

    /// Floor reported before any detection
    #[serde(default = "default_initial_floor")]
    pub initial_floor: Floor,

    /// Re-anchor on every delta match
    #[serde(default)]
    pub track_drift: bool,
}

#[cfg(feature = "serde")]
fn default_reference_floor() -> Floor {
    DEFAULT_REFERENCE_FLOOR
}

#[cfg(feature = "serde")]
fn default_tolerance() -> f32 {
    DEFAULT_PRESSURE_DIFF_TOLERANCE
}

#[cfg(feature = "serde")]
fn default_redundant_count() -> usize {
    DEFAULT_REDUNDANT_MEASUREMENT_COUNT
}

#[cfg(feature = "serde")]
fn default_window_size() -> usize {
    DEFAULT_FILTER_WINDOW_SIZE
}

#[cfg(feature = "serde")]
fn default_initial_floor() -> Floor {
    DEFAULT_INITIAL_FLOOR
}

#[cfg(feature = "serde")]
impl ConfigDocument {
    /// Select the calibration mode and validate the result
    pub fn into_config(self) -> DetectorResult<DetectorConfig> {
        let calibration = match (self.floor_measurements.is_empty(), self.floor_ranges.is_empty()) {
            (false, false) => {
                return Err(DetectorError::Configuration {
                    reason: "floor_measurements and floor_ranges are mutually exclusive",
                });
            }
            (true, true) => {
                return Err(DetectorError::Configuration {
                    reason: "empty calibration table",
                });
            }
            (false, true) => FloorCalibration::Delta {
                reference_floor: self.reference_floor,
                diffs: self.floor_measurements,
            },
            (true, false) => FloorCalibration::Range {
                ranges: self.floor_ranges,
            },
        };

        let config = DetectorConfig {
            calibration,
            pressure_diff_tolerance: self.pressure_diff_tolerance,
            redundant_measurement_count: self.redundant_measurement_count,
            filter_window_size: self.filter_window_size,
            initial_floor: self.initial_floor,
            track_drift: self.track_drift,
        };
        config.validate()?;
        Ok(config)
    }
}
