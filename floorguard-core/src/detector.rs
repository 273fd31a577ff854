//! Floor-Change Detector
//!
//! ## Overview
//!
//! [`FloorDetector`] ties the pieces together:
//!
//! ```text
//! readings ──→ MeasurementMatrix ──→ median per sensor ──→ mean of available
//!                                                              │
//!                       DetectorState (floor, anchor) ←── FloorCalibration
//! ```
//!
//! It knows nothing about transports, process lifecycle or retries. The
//! surrounding service feeds it readings and health flags, asks for the
//! floor when it needs one, and decides what to do with errors.
//!
//! ## Readiness
//!
//! Until `filter_window_size` batches have been registered the detector is
//! [`Readiness::Cold`]: `determine_floor` reports the current (initial)
//! floor and does no filtering at all. Afterwards it is
//! [`Readiness::Warm`].
//!
//! ## Anchoring
//!
//! Delta calibration compares the filtered pressure against the *anchor*,
//! the pressure recorded on the current floor. The anchor is written:
//!
//! - once, when the windows first fill up (the platform is assumed to start
//!   on its initial floor),
//! - on every detected floor change,
//! - on every match when drift tracking is enabled,
//! - by [`FloorDetector::set_current_floor`] and
//!   [`FloorDetector::update_floor_reference_measurement`].
//!
//! A manual floor set while no filtered pressure exists (cold, or every
//! sensor excluded) leaves the anchor pending. The next registration or
//! evaluation that has a filtered pressure fills it in. Range calibration
//! keeps no anchor at all.
//!
//! ## Usage Example
//!
//! ```rust
//! use floorguard_core::{DetectorConfig, FloorCalibration, FloorDetector};
//!
//! let calibration = FloorCalibration::delta(0, &[(0, 0.0), (1, 5.0)])?;
//! let config = DetectorConfig::new(calibration)
//!     .with_tolerance(1.0)
//!     .with_redundant_count(2)
//!     .with_window_size(3);
//! let mut detector = FloorDetector::new(config)?;
//!
//! for _ in 0..3 {
//!     detector.register_measurements(&[100.0, 100.0])?;
//! }
//! detector.set_current_floor(0)?;
//!
//! for _ in 0..3 {
//!     detector.register_measurements(&[105.0, 105.0])?;
//! }
//! let estimate = detector.determine_floor()?;
//! assert_eq!(estimate.floor, 1);
//! assert_eq!(estimate.anchor_pressure, Some(105.0));
//! # Ok::<(), floorguard_core::DetectorError>(())
//! ```

use crate::{
    buffer::MeasurementMatrix,
    calibration::{CalibrationMode, FloorCalibration},
    config::DetectorConfig,
    errors::{DetectorError, DetectorResult},
    filter::{self, FilteredValues},
    state::DetectorState,
    Floor,
};

/// Classifier readiness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Fewer than `filter_window_size` batches registered
    Cold,
    /// Enough readings to trust the medians
    Warm,
}

/// Result of a floor query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorEstimate {
    /// Floor after this evaluation
    pub floor: Floor,

    /// Anchor pressure after this evaluation (delta calibration only)
    pub anchor_pressure: Option<f32>,

    /// Mean of the available medians (`None` while cold)
    pub filtered_pressure: Option<f32>,

    /// Readiness at query time
    pub readiness: Readiness,

    /// True if this evaluation moved the detector to a different floor
    pub changed: bool,
}

/// Stateful floor detector over a set of redundant pressure sensors
#[derive(Debug, Clone)]
pub struct FloorDetector {
    config: DetectorConfig,
    measurements: MeasurementMatrix,
    state: DetectorState,
}

impl FloorDetector {
    /// Build a detector; fails on any configuration problem
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        config.validate()?;

        let measurements = MeasurementMatrix::new(
            config.redundant_measurement_count,
            config.filter_window_size,
        )?;
        let state = DetectorState::new(
            config.initial_floor,
            config.pressure_diff_tolerance,
            config.redundant_measurement_count,
        )?;

        log_info!(
            "Floor detector configured: {:?} calibration, {} floors, {} sensors, window {}, tolerance {}",
            config.calibration.mode(),
            config.calibration.len(),
            config.redundant_measurement_count,
            config.filter_window_size,
            config.pressure_diff_tolerance
        );

        Ok(Self {
            config,
            measurements,
            state,
        })
    }

    /// Store one reading per redundant sensor
    ///
    /// A batch of the wrong size or containing a non-finite reading is
    /// rejected as a whole; the detector keeps working on its previous state.
    pub fn register_measurements(&mut self, readings: &[f32]) -> DetectorResult<()> {
        if let Err(err) = self.measurements.register(readings) {
            log_warn!("Ignoring measurement batch: {}", err);
            return Err(err);
        }

        if self.is_delta() && self.state.anchor_pressure().is_none() && self.measurements.is_warm() {
            if let Ok(pressure) = self.filtered_pressure() {
                self.state.set_anchor(pressure);
                log_debug!(
                    "Anchor pressure for floor {} initialised at {}",
                    self.state.current_floor(),
                    pressure
                );
            }
        }

        Ok(())
    }

    /// Evaluate the current floor
    ///
    /// Cold: returns the current floor untouched. Warm: filters, classifies
    /// and updates the floor (and anchor) on a change.
    pub fn determine_floor(&mut self) -> DetectorResult<FloorEstimate> {
        if !self.measurements.is_warm() {
            return Ok(FloorEstimate {
                floor: self.state.current_floor(),
                anchor_pressure: self.reported_anchor(),
                filtered_pressure: None,
                readiness: Readiness::Cold,
                changed: false,
            });
        }

        let pressure = self.filtered_pressure()?;
        let changed = match self.config.calibration.mode() {
            CalibrationMode::Delta => self.classify_delta(pressure),
            CalibrationMode::Range => self.classify_range(pressure)?,
        };

        Ok(FloorEstimate {
            floor: self.state.current_floor(),
            anchor_pressure: self.reported_anchor(),
            filtered_pressure: Some(pressure),
            readiness: Readiness::Warm,
            changed,
        })
    }

    fn classify_delta(&mut self, pressure: f32) -> bool {
        let anchor = match self.state.anchor_pressure() {
            Some(anchor) => anchor,
            None => {
                self.state.set_anchor(pressure);
                log_debug!(
                    "Pending anchor for floor {} set to {}",
                    self.state.current_floor(),
                    pressure
                );
                pressure
            }
        };

        let current = self.state.current_floor();
        let delta = pressure - anchor;

        match self.config.calibration.classify_delta(delta, current, self.state.tolerance()) {
            Some(found) if found.floor != current => {
                self.state.set_floor(found.floor);
                self.state.set_anchor(pressure);
                log_info!(
                    "Floor change detected: {} -> {} (delta {}, deviation {})",
                    current,
                    found.floor,
                    delta,
                    found.deviation
                );
                true
            }
            Some(_) => {
                if self.config.track_drift {
                    self.state.set_anchor(pressure);
                }
                false
            }
            None => {
                log_debug!(
                    "No calibrated floor within tolerance of delta {}; staying on floor {}",
                    delta,
                    current
                );
                false
            }
        }
    }

    fn classify_range(&mut self, pressure: f32) -> DetectorResult<bool> {
        let current = self.state.current_floor();

        let Some(found) = self.config.calibration.classify_pressure(pressure) else {
            log_warn!("No calibrated floor range contains pressure {}", pressure);
            return Err(DetectorError::NoMatchingFloor { pressure });
        };

        if found.floor == current {
            return Ok(false);
        }

        self.state.set_floor(found.floor);
        log_info!(
            "Floor change detected: {} -> {} (pressure {})",
            current,
            found.floor,
            pressure
        );
        Ok(true)
    }

    /// Manually declare the current floor
    ///
    /// The anchor is refreshed from the latest filtered pressure, or left
    /// pending when none is available yet. Floors missing from the
    /// calibration table are rejected without changing anything.
    pub fn set_current_floor(&mut self, floor: Floor) -> DetectorResult<()> {
        if !self.config.calibration.contains(floor) {
            log_warn!("Refusing to set uncalibrated floor {}", floor);
            return Err(DetectorError::UnknownFloor { floor });
        }

        self.state.set_floor(floor);

        if !self.is_delta() {
            log_info!("Current floor set to {}", floor);
            return Ok(());
        }

        match self.ready_pressure() {
            Ok(pressure) => {
                self.state.set_anchor(pressure);
                log_info!("Current floor set to {} (anchor {})", floor, pressure);
            }
            Err(_) => {
                self.state.clear_anchor();
                log_info!("Current floor set to {} (anchor pending)", floor);
            }
        }

        Ok(())
    }

    /// Re-measure the anchor pressure of the current floor
    ///
    /// Returns the new anchor. Calling this twice without new readings in
    /// between yields the same value. Range calibrations keep no anchor and
    /// fail with [`DetectorError::NoAnchor`] without touching any state.
    pub fn update_floor_reference_measurement(&mut self) -> DetectorResult<f32> {
        if !self.is_delta() {
            return Err(DetectorError::NoAnchor);
        }

        let pressure = self.ready_pressure()?;
        self.state.set_anchor(pressure);
        log_info!(
            "Anchor pressure for floor {} updated to {}",
            self.state.current_floor(),
            pressure
        );
        Ok(pressure)
    }

    /// Replace the sensor availability flags
    ///
    /// Unavailable sensors keep filling their windows but are left out of
    /// the averaged pressure.
    pub fn update_sensor_statuses(&mut self, statuses: &[bool]) -> DetectorResult<()> {
        if let Err(err) = self.state.update_sensor_statuses(statuses) {
            log_warn!("Ignoring sensor status update: {}", err);
            return Err(err);
        }

        if self.state.available_count() == 0 {
            log_warn!("All pressure sensors marked unavailable");
        } else {
            log_debug!("Sensor statuses updated: {:?}", statuses);
        }
        Ok(())
    }

    /// Median of every sensor window (`None` for empty windows)
    pub fn filtered_values(&self) -> FilteredValues {
        filter::filtered_values(&self.measurements)
    }

    /// Mean of the medians of all available sensors
    pub fn filtered_pressure(&self) -> DetectorResult<f32> {
        let values = self.filtered_values();
        filter::available_mean(&values, self.state.sensor_statuses())
    }

    /// Filtered pressure, but only once the detector is warm
    fn ready_pressure(&self) -> DetectorResult<f32> {
        if !self.measurements.is_warm() {
            return Err(DetectorError::NotReady {
                required: self.measurements.window_size(),
                available: self.measurements.registrations(),
            });
        }
        self.filtered_pressure()
    }

    fn is_delta(&self) -> bool {
        self.config.calibration.mode() == CalibrationMode::Delta
    }

    fn reported_anchor(&self) -> Option<f32> {
        if self.is_delta() {
            self.state.anchor_pressure()
        } else {
            None
        }
    }

    /// Floor currently believed to be occupied
    pub fn current_floor(&self) -> Floor {
        self.state.current_floor()
    }

    /// Anchor pressure of the current floor
    ///
    /// `None` while pending and always `None` for range calibrations.
    pub fn anchor_pressure(&self) -> Option<f32> {
        self.reported_anchor()
    }

    /// Cold until `filter_window_size` batches have been registered
    pub fn readiness(&self) -> Readiness {
        if self.measurements.is_warm() {
            Readiness::Warm
        } else {
            Readiness::Cold
        }
    }

    /// Availability flag per sensor
    pub fn sensor_statuses(&self) -> &[bool] {
        self.state.sensor_statuses()
    }

    /// Accepted measurement batches since construction
    pub fn registrations(&self) -> usize {
        self.measurements.registrations()
    }

    /// Raw sensor windows
    pub fn measurements(&self) -> &MeasurementMatrix {
        &self.measurements
    }

    /// Calibration table in use
    pub fn calibration(&self) -> &FloorCalibration {
        &self.config.calibration
    }

    /// Configuration the detector was built from
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
}
