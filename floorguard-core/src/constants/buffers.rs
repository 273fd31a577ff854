//! Buffer Sizes and Memory Constraints
//!
//! The detector keeps all of its state in fixed-size storage so it can run on
//! microcontrollers next to the pressure sensors. These limits bound that
//! storage; configurations exceeding them are rejected at construction.

// ===== FILTER WINDOW =====

/// Maximum median filter window size (readings per sensor).
///
/// Sized for barometers sampled at 10-50 Hz:
/// - 64 samples × 4 bytes = 256 bytes per sensor
/// - Over a second of history at 50 Hz, several seconds at 10 Hz
/// - Larger windows delay floor-change detection noticeably in elevators
///
/// Source: Mobile robot deployments with BMP280/LPS22 class sensors
pub const MAX_FILTER_WINDOW_SIZE: usize = 64;

// ===== REDUNDANT SENSORS =====

/// Maximum number of redundant pressure sensors.
///
/// Practical limit for sensor redundancy:
/// - A robot base rarely carries more than one sensor per wheel
/// - 8 sensors × 256 bytes of window = 2KB worst case
///
/// Source: Smart wheel platforms (one barometer per wheel module)
pub const MAX_REDUNDANT_SENSORS: usize = 8;

// ===== CALIBRATION TABLE =====

/// Maximum number of calibrated floors.
///
/// Covers basements plus mid-rise buildings. Each entry is ~12 bytes.
///
/// Source: Indoor service robot deployments
pub const MAX_CALIBRATED_FLOORS: usize = 32;
