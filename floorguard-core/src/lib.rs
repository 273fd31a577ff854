//! Core floor-change detector for FloorGuard
//!
//! Estimates which floor of a building a mobile platform is on from relative
//! barometric pressure. Readings from one or more redundant sensors are
//! median filtered, averaged over the sensors the health monitor trusts, and
//! classified against a per-floor calibration table.
//!
//! Key constraints:
//! - No heap allocation; all state lives in fixed-size buffers
//! - Runs on `no_std` targets next to the sensors
//! - Every operation is a bounded, synchronous computation
//!
//! ```no_run
//! use floorguard_core::{DetectorConfig, FloorCalibration, FloorDetector};
//!
//! let calibration = FloorCalibration::delta(0, &[(0, 0.0), (1, -0.42), (2, -0.83)]).unwrap();
//! let config = DetectorConfig::new(calibration).with_tolerance(0.1).with_redundant_count(4);
//! let mut detector = FloorDetector::new(config).unwrap();
//!
//! // Feed one reading per sensor as they arrive
//! detector.register_measurements(&[1013.2, 1013.3, 1013.1, 1013.2]).unwrap();
//!
//! match detector.determine_floor() {
//!     Ok(estimate) => {}, // publish estimate.floor
//!     Err(e) => {},       // e.g. all sensors marked unavailable
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod buffer;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod filter;
pub mod state;
pub mod traits;

#[cfg(feature = "std")]
pub mod shared;

/// Floor number in building numbering (negative for basements)
pub type Floor = i32;

// Public API
pub use calibration::{CalibrationMode, FloorCalibration, FloorDelta, FloorRange};
pub use config::DetectorConfig;
pub use detector::{FloorDetector, FloorEstimate, Readiness};
pub use errors::{DetectorError, DetectorResult};

#[cfg(feature = "std")]
pub use shared::SharedFloorDetector;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
