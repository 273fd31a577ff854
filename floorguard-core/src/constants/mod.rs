//! Constants for FloorGuard Core
//!
//! Centralized limits and defaults used throughout the detector. Every
//! numeric value lives here with a note on where it comes from.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Buffers**: Fixed storage limits for windows, sensors and calibration tables
//! - **Detector**: Default detector parameters for a deployment file that omits them
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Use descriptive names that include units where they apply

/// Fixed storage limits for embedded-friendly, allocation-free state.
pub mod buffers;

/// Default detector parameters.
pub mod detector;

// Re-export commonly used constants for convenience
pub use buffers::{
    MAX_FILTER_WINDOW_SIZE, MAX_REDUNDANT_SENSORS, MAX_CALIBRATED_FLOORS,
};

pub use detector::{
    DEFAULT_FILTER_WINDOW_SIZE, DEFAULT_REDUNDANT_MEASUREMENT_COUNT,
    DEFAULT_PRESSURE_DIFF_TOLERANCE, DEFAULT_REFERENCE_FLOOR, DEFAULT_INITIAL_FLOOR,
};
