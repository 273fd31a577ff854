//! Thread-Safe Detector Handle
//!
//! Readings arrive on one thread (the sensor subscriber), floor queries on
//! another (the request handler), and health updates on a third. All of them
//! mutate the same windows and state, so every operation runs under a single
//! lock held for its whole read-modify-write. None of the operations block or
//! take long, so one coarse lock is enough.
//!
//! ```rust
//! use std::thread;
//! use floorguard_core::{DetectorConfig, FloorCalibration, SharedFloorDetector};
//!
//! let calibration = FloorCalibration::delta(0, &[(0, 0.0), (1, 5.0)])?;
//! let detector = SharedFloorDetector::new(DetectorConfig::new(calibration).with_tolerance(1.0))?;
//!
//! let feeder = detector.clone();
//! thread::spawn(move || {
//!     for _ in 0..10 {
//!         let _ = feeder.register_measurements(&[1013.2]);
//!     }
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(detector.determine_floor()?.floor, 0);
//! # Ok::<(), floorguard_core::DetectorError>(())
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    config::DetectorConfig,
    detector::{FloorDetector, FloorEstimate},
    errors::{DetectorError, DetectorResult},
    Floor,
};

/// Cloneable handle to one detector guarded by a mutex
#[derive(Debug, Clone)]
pub struct SharedFloorDetector {
    inner: Arc<Mutex<FloorDetector>>,
}

impl SharedFloorDetector {
    /// Build a detector and wrap it
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        Ok(Self::from_detector(FloorDetector::new(config)?))
    }

    /// Wrap an existing detector
    pub fn from_detector(detector: FloorDetector) -> Self {
        Self {
            inner: Arc::new(Mutex::new(detector)),
        }
    }

    fn lock(&self) -> DetectorResult<MutexGuard<'_, FloorDetector>> {
        self.inner.lock().map_err(|_| {
            log_warn!("Floor detector lock poisoned");
            DetectorError::StatePoisoned
        })
    }

    /// Run several operations under one lock acquisition
    pub fn with<R>(&self, f: impl FnOnce(&mut FloorDetector) -> R) -> DetectorResult<R> {
        let mut detector = self.lock()?;
        Ok(f(&mut detector))
    }

    /// See [`FloorDetector::register_measurements`]
    pub fn register_measurements(&self, readings: &[f32]) -> DetectorResult<()> {
        self.lock()?.register_measurements(readings)
    }

    /// See [`FloorDetector::determine_floor`]
    pub fn determine_floor(&self) -> DetectorResult<FloorEstimate> {
        self.lock()?.determine_floor()
    }

    /// See [`FloorDetector::set_current_floor`]
    pub fn set_current_floor(&self, floor: Floor) -> DetectorResult<()> {
        self.lock()?.set_current_floor(floor)
    }

    /// See [`FloorDetector::update_floor_reference_measurement`]
    pub fn update_floor_reference_measurement(&self) -> DetectorResult<f32> {
        self.lock()?.update_floor_reference_measurement()
    }

    /// See [`FloorDetector::update_sensor_statuses`]
    pub fn update_sensor_statuses(&self, statuses: &[bool]) -> DetectorResult<()> {
        self.lock()?.update_sensor_statuses(statuses)
    }

    /// Floor currently believed to be occupied
    pub fn current_floor(&self) -> DetectorResult<Floor> {
        Ok(self.lock()?.current_floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::FloorCalibration;
    use std::thread;

    fn shared() -> SharedFloorDetector {
        let calibration = FloorCalibration::delta(0, &[(0, 0.0), (1, 5.0)]).unwrap();
        let config = DetectorConfig::new(calibration)
            .with_tolerance(1.0)
            .with_redundant_count(2)
            .with_window_size(5);
        SharedFloorDetector::new(config).unwrap()
    }

    #[test]
    fn concurrent_registration_keeps_windows_in_step() {
        let detector = shared();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let feeder = detector.clone();
                thread::spawn(move || {
                    for _ in 0..25 {
                        feeder.register_measurements(&[100.0, 100.0]).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let (registrations, lens) = detector
            .with(|d| {
                let lens: Vec<usize> = d.measurements().windows().iter().map(|w| w.len()).collect();
                (d.registrations(), lens)
            })
            .unwrap();
        assert_eq!(registrations, 100);
        assert_eq!(lens, vec![5, 5]);
    }

    #[test]
    fn queries_during_registration() {
        let detector = shared();
        let feeder = detector.clone();

        let writer = thread::spawn(move || {
            for i in 0..200 {
                let p = if i < 100 { 100.0 } else { 105.0 };
                feeder.register_measurements(&[p, p]).unwrap();
            }
        });

        for _ in 0..50 {
            // Every answer is a calibrated floor; never a half-written window
            let floor = detector.determine_floor().unwrap().floor;
            assert!(floor == 0 || floor == 1);
        }
        writer.join().unwrap();

        assert_eq!(detector.determine_floor().unwrap().floor, 1);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let detector = shared();
        let poisoner = detector.clone();

        let _ = thread::spawn(move || {
            let _ = poisoner.with(|_| panic!("sensor thread crashed"));
        })
        .join();

        assert_eq!(detector.current_floor(), Err(DetectorError::StatePoisoned));
    }
}
