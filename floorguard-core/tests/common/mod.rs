//! Common test utilities and data generators for integration tests
//!
//! This module provides:
//! - Detector fixtures for the calibration layouts used across tests
//! - A deterministic RNG so noisy scenarios are reproducible
//! - An elevator ride generator producing redundant barometer batches
//! - Assertion helpers

#![allow(dead_code)]

use floorguard_core::{DetectorConfig, Floor, FloorCalibration, FloorDetector};

/// Pressure drop per floor in hPa (3.5 m storeys)
pub const HPA_PER_FLOOR: f32 = 0.42;

/// Ground floor pressure used by the generators
pub const GROUND_PRESSURE_HPA: f32 = 1013.25;

/// Two sensors, window 3, floors 0/1 five units apart, tolerance 1
pub fn two_floor_config() -> DetectorConfig {
    let calibration = FloorCalibration::delta(0, &[(0, 0.0), (1, 5.0)]).unwrap();
    DetectorConfig::new(calibration)
        .with_tolerance(1.0)
        .with_redundant_count(2)
        .with_window_size(3)
}

/// Building with a basement and four upper floors, delta calibrated in hPa
pub fn building_config(sensors: usize, window: usize) -> DetectorConfig {
    let entries: Vec<(Floor, f32)> = (-1..=4)
        .map(|floor| (floor, -(floor as f32) * HPA_PER_FLOOR))
        .collect();
    let calibration = FloorCalibration::delta(0, &entries).unwrap();
    DetectorConfig::new(calibration)
        .with_tolerance(HPA_PER_FLOOR / 3.0)
        .with_redundant_count(sensors)
        .with_window_size(window)
}

/// Same building, absolute ranges instead of deltas
pub fn building_range_config(window: usize) -> DetectorConfig {
    let half = HPA_PER_FLOOR / 2.0;
    let entries: Vec<(Floor, f32, f32)> = (-1..=4)
        .map(|floor| {
            let centre = GROUND_PRESSURE_HPA - floor as f32 * HPA_PER_FLOOR;
            (floor, centre - half + 0.01, centre + half - 0.01)
        })
        .collect();
    DetectorConfig::new(FloorCalibration::range(&entries).unwrap()).with_window_size(window)
}

/// Build a detector, panicking on configuration errors
pub fn detector(config: DetectorConfig) -> FloorDetector {
    FloorDetector::new(config).expect("test configuration must be valid")
}

/// Register the same batch `times` times
pub fn fill(detector: &mut FloorDetector, readings: &[f32], times: usize) {
    for _ in 0..times {
        detector.register_measurements(readings).unwrap();
    }
}

/// Xorshift RNG for reproducible noise
pub struct TestRng {
    state: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / 16777216.0
    }

    pub fn gen_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }
}

/// Generates redundant barometer batches for a platform moving between floors
///
/// Each sensor sees the true pressure plus a fixed per-sensor offset (the
/// sensors are only relatively calibrated), uniform noise, and optionally a
/// periodic +3 hPa spike on one sensor at a time.
pub struct ElevatorRide {
    rng: TestRng,
    offsets: Vec<f32>,
    noise_hpa: f32,
    spike_period: Option<usize>,
    batches: usize,
    floor: Floor,
}

impl ElevatorRide {
    pub fn new(sensors: usize, seed: u32) -> Self {
        let mut rng = TestRng::new(seed);
        let offsets = (0..sensors).map(|_| rng.gen_range(-1.5, 1.5)).collect();
        Self {
            rng,
            offsets,
            noise_hpa: 0.03,
            spike_period: None,
            batches: 0,
            floor: 0,
        }
    }

    pub fn with_noise(mut self, noise_hpa: f32) -> Self {
        self.noise_hpa = noise_hpa;
        self
    }

    /// Every `period`-th batch carries a spike, rotating through the sensors
    pub fn with_spikes(mut self, period: usize) -> Self {
        self.spike_period = Some(period.max(1));
        self
    }

    /// Sensors read the true pressure without offsets
    pub fn without_offsets(mut self) -> Self {
        self.offsets.iter_mut().for_each(|o| *o = 0.0);
        self
    }

    pub fn go_to(&mut self, floor: Floor) {
        self.floor = floor;
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    /// One reading per sensor at the current floor
    pub fn batch(&mut self) -> Vec<f32> {
        let true_pressure = GROUND_PRESSURE_HPA - self.floor as f32 * HPA_PER_FLOOR;
        let spiked_sensor = self.spike_period.and_then(|period| {
            (self.batches % period == period - 1)
                .then(|| (self.batches / period) % self.offsets.len())
        });
        self.batches += 1;

        let mut readings = Vec::with_capacity(self.offsets.len());
        for i in 0..self.offsets.len() {
            let noise = self.rng.gen_range(-self.noise_hpa, self.noise_hpa);
            let spike = if spiked_sensor == Some(i) { 3.0 } else { 0.0 };
            readings.push(true_pressure + self.offsets[i] + noise + spike);
        }
        readings
    }

    /// Register `count` batches with the detector
    pub fn dwell(&mut self, detector: &mut FloorDetector, count: usize) {
        for _ in 0..count {
            let batch = self.batch();
            detector.register_measurements(&batch).unwrap();
        }
    }
}

/// Assert two floats are within a tolerance
#[macro_export]
macro_rules! assert_within_tolerance {
    ($actual:expr, $expected:expr, $tolerance:expr) => {
        let actual = $actual;
        let expected = $expected;
        assert!(
            (actual - expected).abs() <= $tolerance,
            "Expected {} within {} of {}",
            actual, $tolerance, expected
        );
    };
}
