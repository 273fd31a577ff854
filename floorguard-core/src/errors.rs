//! Detector errors
//!
//! Variants carry only `Copy` data and `&'static str` reasons so they can be
//! returned on `no_std` targets. `Configuration` only comes out of
//! construction and `StatePoisoned` only out of the shared handle; every
//! other variant leaves the detector usable.

use thiserror_no_std::Error;

use crate::Floor;

/// Result type for detector operations
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Detector errors - kept small and `Copy` for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum DetectorError {
    /// Calibration table or detector parameters are unusable
    #[error("Invalid configuration: {reason}")]
    Configuration {
        /// What made the configuration unusable
        reason: &'static str,
    },

    /// Wrong number of readings or health flags for the configured sensor count
    #[error("Expected {expected} entries, got {actual}")]
    InputCardinality {
        /// Configured redundant sensor count
        expected: usize,
        /// Number of entries actually supplied
        actual: usize,
    },

    /// A reading in the batch was NaN or infinite
    #[error("Invalid reading at sensor {index}: not a valid number")]
    InvalidReading {
        /// Sensor slot holding the offending reading
        index: usize,
    },

    /// Every redundant sensor is currently marked unavailable
    #[error("No pressure sensors available")]
    NoAvailableSensors,

    /// No calibrated range contains the filtered pressure
    #[error("No calibrated floor range contains pressure {pressure}")]
    NoMatchingFloor {
        /// Filtered mean pressure that fell outside every range
        pressure: f32,
    },

    /// The averaged sensor medians left the finite `f32` range
    #[error("Filtered pressure is not finite")]
    PressureOverflow,

    /// Range calibration keeps no anchor pressure to refresh
    #[error("Range calibration has no anchor pressure")]
    NoAnchor,

    /// Floor number is not present in the calibration table
    #[error("Floor {floor} is not calibrated")]
    UnknownFloor {
        /// The rejected floor number
        floor: Floor,
    },

    /// Not enough readings have been registered to filter yet
    #[error("Not ready: need {required} registrations, have {available}")]
    NotReady {
        /// Registrations needed to fill the filter windows
        required: usize,
        /// Registrations accepted so far
        available: usize,
    },

    /// A thread panicked while holding the shared detector lock
    #[error("Detector state lock poisoned")]
    StatePoisoned,
}

impl DetectorError {
    /// True for errors after which the caller can simply retry or resubmit
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration { .. } | Self::StatePoisoned)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DetectorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Configuration { reason } =>
                defmt::write!(fmt, "Configuration: {}", reason),
            Self::InputCardinality { expected, actual } =>
                defmt::write!(fmt, "Expected {} entries, got {}", expected, actual),
            Self::InvalidReading { index } =>
                defmt::write!(fmt, "Invalid reading at sensor {}", index),
            Self::NoAvailableSensors =>
                defmt::write!(fmt, "No sensors available"),
            Self::NoMatchingFloor { pressure } =>
                defmt::write!(fmt, "No floor range contains {}", pressure),
            Self::PressureOverflow =>
                defmt::write!(fmt, "Filtered pressure not finite"),
            Self::NoAnchor =>
                defmt::write!(fmt, "Range calibration has no anchor"),
            Self::UnknownFloor { floor } =>
                defmt::write!(fmt, "Floor {} not calibrated", floor),
            Self::NotReady { required, available } =>
                defmt::write!(fmt, "Need {} registrations, have {}", required, available),
            Self::StatePoisoned =>
                defmt::write!(fmt, "State lock poisoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_is_fatal() {
        let err = DetectorError::Configuration { reason: "empty calibration table" };
        assert!(!err.is_recoverable());
        assert!(DetectorError::NoAvailableSensors.is_recoverable());
        assert!(DetectorError::InputCardinality { expected: 2, actual: 1 }.is_recoverable());
    }

    #[test]
    fn display_messages() {
        let err = DetectorError::InputCardinality { expected: 3, actual: 0 };
        assert_eq!(err.to_string(), "Expected 3 entries, got 0");

        let err = DetectorError::UnknownFloor { floor: -2 };
        assert_eq!(err.to_string(), "Floor -2 is not calibrated");
    }
}
