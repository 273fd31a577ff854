//! Reference and Sensor Health State
//!
//! Holds everything the detector believes about where it is: the current
//! floor, the anchor pressure measured on that floor, the match tolerance and
//! which redundant sensors the health monitor currently trusts.
//!
//! The state only changes through explicit calls. Classification outcomes,
//! manual floor resets and health updates all go through the detector facade,
//! which decides when to write here.

use heapless::Vec;

use crate::{
    constants::buffers::MAX_REDUNDANT_SENSORS,
    errors::{DetectorError, DetectorResult},
    traits::Validatable,
    Floor,
};

/// Current floor, anchor pressure, tolerance and sensor availability
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorState {
    current_floor: Floor,

    /// `None` while pending: no filtered pressure has been recorded for the
    /// current floor yet
    anchor_pressure: Option<f32>,

    tolerance: f32,

    /// `true` = sensor contributes to the averaged median
    sensor_statuses: Vec<bool, MAX_REDUNDANT_SENSORS>,
}

impl DetectorState {
    /// Initial state: `initial_floor`, pending anchor, all sensors available
    pub fn new(initial_floor: Floor, tolerance: f32, sensor_count: usize) -> DetectorResult<Self> {
        if !tolerance.is_valid() || tolerance < 0.0 {
            return Err(DetectorError::Configuration {
                reason: "pressure difference tolerance must be finite and non-negative",
            });
        }
        if sensor_count == 0 || sensor_count > MAX_REDUNDANT_SENSORS {
            return Err(DetectorError::Configuration {
                reason: "redundant measurement count out of range",
            });
        }

        let mut sensor_statuses = Vec::new();
        for _ in 0..sensor_count {
            let _ = sensor_statuses.push(true);
        }

        Ok(Self {
            current_floor: initial_floor,
            anchor_pressure: None,
            tolerance,
            sensor_statuses,
        })
    }

    /// Floor currently believed to be occupied
    pub fn current_floor(&self) -> Floor {
        self.current_floor
    }

    /// Anchor pressure of the current floor, `None` while pending
    pub fn anchor_pressure(&self) -> Option<f32> {
        self.anchor_pressure
    }

    /// Allowed deviation from a calibrated pressure difference
    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Availability flag per sensor
    pub fn sensor_statuses(&self) -> &[bool] {
        &self.sensor_statuses
    }

    /// Number of sensors currently marked available
    pub fn available_count(&self) -> usize {
        self.sensor_statuses.iter().filter(|&&ok| ok).count()
    }

    /// Overwrite the current floor; the anchor is left alone
    pub fn set_floor(&mut self, floor: Floor) {
        self.current_floor = floor;
    }

    /// Record the anchor pressure for the current floor
    pub fn set_anchor(&mut self, pressure: f32) {
        self.anchor_pressure = Some(pressure);
    }

    /// Mark the anchor as pending until the next filtered pressure is available
    pub fn clear_anchor(&mut self) {
        self.anchor_pressure = None;
    }

    /// Replace the availability vector
    ///
    /// Rejected without change when `statuses` does not have one entry per
    /// sensor.
    pub fn update_sensor_statuses(&mut self, statuses: &[bool]) -> DetectorResult<()> {
        if statuses.len() != self.sensor_statuses.len() {
            return Err(DetectorError::InputCardinality {
                expected: self.sensor_statuses.len(),
                actual: statuses.len(),
            });
        }

        self.sensor_statuses.copy_from_slice(statuses);
        Ok(())
    }
}
