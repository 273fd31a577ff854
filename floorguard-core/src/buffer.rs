//! Sliding windows for redundant pressure readings
//!
//! One ring buffer per sensor, grouped in a [`MeasurementMatrix`]. The window
//! size comes from configuration, so storage is a fixed array of
//! [`MAX_FILTER_WINDOW_SIZE`] slots of which only `capacity` are used.
//!
//! ```text
//! capacity = 3 after pushing 1, 2, 3, 4:
//! physical [4, 2, 3, -, ...]   write_pos = 1
//! logical  [2, 3, 4]           oldest → newest
//! ```
//!
//! A batch is checked in full before any window is written, so the windows
//! never drift out of step.

use heapless::Vec;

use crate::{
    constants::buffers::{MAX_FILTER_WINDOW_SIZE, MAX_REDUNDANT_SENSORS},
    errors::{DetectorError, DetectorResult},
    traits::Validatable,
};

/// Sliding window of the most recent readings from one sensor
///
/// ## Internal Invariants
///
/// - `1 <= capacity <= MAX_FILTER_WINDOW_SIZE`
/// - `write_pos < capacity`
/// - `len <= capacity`
/// - Iteration yields readings in arrival order
#[derive(Debug, Clone)]
pub struct SensorWindow {
    /// Backing storage; only the first `capacity` slots are used
    data: [f32; MAX_FILTER_WINDOW_SIZE],

    /// Configured window size
    capacity: usize,

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid readings
    len: usize,
}

impl SensorWindow {
    /// Creates an empty window holding at most `capacity` readings
    pub fn new(capacity: usize) -> DetectorResult<Self> {
        if capacity == 0 {
            return Err(DetectorError::Configuration {
                reason: "filter window size must be at least 1",
            });
        }
        if capacity > MAX_FILTER_WINDOW_SIZE {
            return Err(DetectorError::Configuration {
                reason: "filter window size exceeds MAX_FILTER_WINDOW_SIZE",
            });
        }

        Ok(Self {
            data: [0.0; MAX_FILTER_WINDOW_SIZE],
            capacity,
            write_pos: 0,
            len: 0,
        })
    }

    /// Adds a reading, evicting the oldest one when the window is full
    pub fn push(&mut self, value: f32) {
        self.data[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % self.capacity;

        if self.len < self.capacity {
            self.len += 1;
        }
    }

    /// Number of stored readings
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no reading has arrived yet
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Configured window size
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over readings from oldest to newest
    pub fn iter(&self) -> SensorWindowIter<'_> {
        SensorWindowIter {
            window: self,
            index: 0,
        }
    }

    /// Reading by logical index (0 = oldest, len-1 = newest)
    ///
    /// Until the window is full the data starts at slot 0. Once full, the
    /// oldest reading sits at `write_pos`:
    ///
    /// ```text
    /// Physical:  [D, E, A, B, C]  (write_pos = 2)
    /// Logical:   [A, B, C, D, E]
    /// logical[i] = physical[(write_pos + i) % capacity]
    /// ```
    fn get(&self, index: usize) -> Option<f32> {
        if index >= self.len {
            return None;
        }

        let actual_index = if self.len < self.capacity {
            index
        } else {
            (self.write_pos + index) % self.capacity
        };

        Some(self.data[actual_index])
    }
}

/// Iterator over window contents, oldest first
pub struct SensorWindowIter<'a> {
    window: &'a SensorWindow,
    index: usize,
}

impl<'a> Iterator for SensorWindowIter<'a> {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.window.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.window.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

/// One sliding window per redundant sensor, all sharing the same capacity
#[derive(Debug, Clone)]
pub struct MeasurementMatrix {
    windows: Vec<SensorWindow, MAX_REDUNDANT_SENSORS>,

    /// Accepted batches since construction (saturating)
    registrations: usize,
}

impl MeasurementMatrix {
    /// Creates `sensor_count` empty windows of `window_size` readings each
    pub fn new(sensor_count: usize, window_size: usize) -> DetectorResult<Self> {
        if sensor_count == 0 {
            return Err(DetectorError::Configuration {
                reason: "redundant measurement count must be at least 1",
            });
        }
        if sensor_count > MAX_REDUNDANT_SENSORS {
            return Err(DetectorError::Configuration {
                reason: "redundant measurement count exceeds MAX_REDUNDANT_SENSORS",
            });
        }

        let window = SensorWindow::new(window_size)?;
        let mut windows = Vec::new();
        for _ in 0..sensor_count {
            // Capacity checked against MAX_REDUNDANT_SENSORS above
            let _ = windows.push(window.clone());
        }

        Ok(Self {
            windows,
            registrations: 0,
        })
    }

    /// Appends one reading to each sensor window
    ///
    /// The batch is validated in full first; a rejected batch leaves every
    /// window exactly as it was.
    pub fn register(&mut self, readings: &[f32]) -> DetectorResult<()> {
        if readings.len() != self.windows.len() {
            return Err(DetectorError::InputCardinality {
                expected: self.windows.len(),
                actual: readings.len(),
            });
        }

        if let Some(index) = readings.iter().position(|r| !r.is_valid()) {
            return Err(DetectorError::InvalidReading { index });
        }

        for (window, &reading) in self.windows.iter_mut().zip(readings) {
            window.push(reading);
        }
        self.registrations = self.registrations.saturating_add(1);

        Ok(())
    }

    /// Number of redundant sensors
    pub fn sensor_count(&self) -> usize {
        self.windows.len()
    }

    /// Configured filter window size
    pub fn window_size(&self) -> usize {
        self.windows.first().map_or(0, SensorWindow::capacity)
    }

    /// Accepted batches since construction
    pub fn registrations(&self) -> usize {
        self.registrations
    }

    /// True once at least `window_size` batches have been accepted
    pub fn is_warm(&self) -> bool {
        self.registrations >= self.window_size()
    }

    /// Window of a single sensor
    pub fn window(&self, index: usize) -> Option<&SensorWindow> {
        self.windows.get(index)
    }

    /// All windows in sensor order
    pub fn windows(&self) -> &[SensorWindow] {
        &self.windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_window() {
        let window = SensorWindow::new(5).unwrap();
        assert!(window.is_empty());
        assert_eq!(window.len(), 0);
        assert_eq!(window.iter().count(), 0);
    }

    #[test]
    fn window_capacity_bounds() {
        assert!(matches!(
            SensorWindow::new(0),
            Err(DetectorError::Configuration { .. })
        ));
        assert!(SensorWindow::new(MAX_FILTER_WINDOW_SIZE).is_ok());
        assert!(SensorWindow::new(MAX_FILTER_WINDOW_SIZE + 1).is_err());
    }

    #[test]
    fn fifo_eviction() {
        let mut window = SensorWindow::new(3).unwrap();

        for i in 0..5 {
            window.push(i as f32);
        }

        assert_eq!(window.len(), 3);

        // 0 and 1 were evicted
        let values: std::vec::Vec<f32> = window.iter().collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn single_slot_window() {
        let mut window = SensorWindow::new(1).unwrap();
        window.push(1.0);
        window.push(2.0);

        assert_eq!(window.len(), 1);
        assert_eq!(window.iter().collect::<std::vec::Vec<_>>(), vec![2.0]);
    }

    #[test]
    fn matrix_rejects_bad_dimensions() {
        assert!(MeasurementMatrix::new(0, 5).is_err());
        assert!(MeasurementMatrix::new(MAX_REDUNDANT_SENSORS + 1, 5).is_err());
        assert!(MeasurementMatrix::new(2, 0).is_err());
    }

    #[test]
    fn matrix_register_appends_to_every_window() {
        let mut matrix = MeasurementMatrix::new(3, 4).unwrap();
        matrix.register(&[1.0, 2.0, 3.0]).unwrap();
        matrix.register(&[4.0, 5.0, 6.0]).unwrap();

        assert_eq!(matrix.registrations(), 2);
        assert_eq!(matrix.window(1).unwrap().iter().collect::<std::vec::Vec<_>>(), vec![2.0, 5.0]);
        assert_eq!(matrix.window(2).unwrap().iter().collect::<std::vec::Vec<_>>(), vec![3.0, 6.0]);
    }

    #[test]
    fn matrix_rejects_wrong_cardinality_without_mutation() {
        let mut matrix = MeasurementMatrix::new(2, 3).unwrap();
        matrix.register(&[1.0, 1.0]).unwrap();

        let result = matrix.register(&[2.0]);
        assert_eq!(result, Err(DetectorError::InputCardinality { expected: 2, actual: 1 }));

        let result = matrix.register(&[2.0, 2.0, 2.0]);
        assert_eq!(result, Err(DetectorError::InputCardinality { expected: 2, actual: 3 }));

        assert_eq!(matrix.registrations(), 1);
        assert_eq!(matrix.window(0).unwrap().len(), 1);
        assert_eq!(matrix.window(1).unwrap().len(), 1);
    }

    #[test]
    fn matrix_rejects_non_finite_batch() {
        let mut matrix = MeasurementMatrix::new(3, 3).unwrap();

        let result = matrix.register(&[1.0, 2.0, f32::NAN]);
        assert_eq!(result, Err(DetectorError::InvalidReading { index: 2 }));

        // Slots 0 and 1 must not have been written
        assert!(matrix.windows().iter().all(SensorWindow::is_empty));
        assert_eq!(matrix.registrations(), 0);
    }

    #[test]
    fn matrix_warms_after_window_size_batches() {
        let mut matrix = MeasurementMatrix::new(1, 3).unwrap();

        matrix.register(&[1.0]).unwrap();
        matrix.register(&[1.0]).unwrap();
        assert!(!matrix.is_warm());

        matrix.register(&[1.0]).unwrap();
        assert!(matrix.is_warm());
    }
}
