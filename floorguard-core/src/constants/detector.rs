//! Detector Defaults
//!
//! Values used when a deployment configuration leaves a parameter out. They
//! match the defaults of the calibration files shipped with existing
//! deployments, so old files keep loading unchanged.

use crate::Floor;

/// Default median filter window size (readings per sensor).
///
/// Five samples reject isolated spikes (door slams, HVAC gusts) while adding
/// only a couple of sample periods of latency.
pub const DEFAULT_FILTER_WINDOW_SIZE: usize = 5;

/// Default number of redundant pressure sensors.
pub const DEFAULT_REDUNDANT_MEASUREMENT_COUNT: usize = 1;

/// Default allowed deviation from a calibrated pressure difference.
///
/// Zero only matches exact calibrated values, so real deployments always set
/// this explicitly. Roughly 0.4 hPa separates floors of a 3.5 m building.
pub const DEFAULT_PRESSURE_DIFF_TOLERANCE: f32 = 0.0;

/// Default reference floor for delta calibration.
pub const DEFAULT_REFERENCE_FLOOR: Floor = 0;

/// Floor reported before any floor has been detected or set.
pub const DEFAULT_INITIAL_FLOOR: Floor = 0;
