//! Median Filtering and Redundant Sensor Averaging
//!
//! ## Overview
//!
//! Barometric floor detection works on pressure differences of well under a
//! hectopascal, while single readings jump by that much when a door slams or
//! the ventilation kicks in. Each sensor window is therefore reduced to its
//! median, which ignores isolated spikes instead of averaging them in.
//!
//! The medians of all sensors the health monitor currently trusts are then
//! averaged into one filtered pressure:
//!
//! ```text
//! p̄ = (1/k) · Σ median(windowᵢ)   for the k available sensors i
//! ```
//!
//! ## Median Semantics
//!
//! Standard definition: the middle element for odd counts, the mean of the
//! two middle elements for even counts. An empty window has no median and is
//! reported as `None`; it never contributes a made-up zero.
//!
//! ## Usage Example
//!
//! ```rust
//! use floorguard_core::filter::median;
//!
//! // The 1020.0 spike does not drag the result up
//! let mut readings = [1013.5, 1013.0, 1020.0, 1013.25];
//! assert_eq!(median(&mut readings), Some(1013.375));
//! ```

use heapless::Vec;

use crate::{
    buffer::{MeasurementMatrix, SensorWindow},
    constants::buffers::{MAX_FILTER_WINDOW_SIZE, MAX_REDUNDANT_SENSORS},
    errors::{DetectorError, DetectorResult},
    traits::Validatable,
};

/// Per-sensor medians, `None` for sensors without readings
pub type FilteredValues = Vec<Option<f32>, MAX_REDUNDANT_SENSORS>;

/// Median of a slice of readings; sorts the slice in place
pub fn median(data: &mut [f32]) -> Option<f32> {
    if data.is_empty() {
        return None;
    }

    data.sort_unstable_by(f32::total_cmp);

    let n = data.len();
    if n % 2 == 0 {
        Some((data[n / 2 - 1] + data[n / 2]) / 2.0)
    } else {
        Some(data[n / 2])
    }
}

/// Median of one sensor window
pub fn window_median(window: &SensorWindow) -> Option<f32> {
    let mut scratch: Vec<f32, MAX_FILTER_WINDOW_SIZE> = Vec::new();
    for reading in window.iter() {
        // Window capacity never exceeds MAX_FILTER_WINDOW_SIZE
        let _ = scratch.push(reading);
    }
    median(&mut scratch)
}

/// Median of every sensor window, in sensor order
pub fn filtered_values(matrix: &MeasurementMatrix) -> FilteredValues {
    let mut values = Vec::new();
    for window in matrix.windows() {
        // Sensor count never exceeds MAX_REDUNDANT_SENSORS
        let _ = values.push(window_median(window));
    }
    values
}

/// Mean of the medians of all sensors marked available
///
/// Sensors marked unavailable are skipped even though their windows keep
/// filling. Available sensors without a median yet are skipped too.
/// Fails with [`DetectorError::NoAvailableSensors`] when nothing is left to
/// average, and with [`DetectorError::PressureOverflow`] when the mean is not
/// a finite number.
///
/// The mean is accumulated incrementally, so large readings near `f32::MAX`
/// do not overflow a running sum.
pub fn available_mean(values: &[Option<f32>], available: &[bool]) -> DetectorResult<f32> {
    let (mean, count) = values
        .iter()
        .zip(available)
        .filter(|&(_, &ok)| ok)
        .filter_map(|(value, _)| *value)
        .fold((0.0f32, 0usize), |(mean, count), v| {
            let count = count + 1;
            (mean + (v - mean) / count as f32, count)
        });

    if count == 0 {
        return Err(DetectorError::NoAvailableSensors);
    }
    if !mean.is_valid() {
        return Err(DetectorError::PressureOverflow);
    }

    Ok(mean)
}
