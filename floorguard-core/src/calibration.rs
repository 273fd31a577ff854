//! Floor Calibration Tables and Classification
//!
//! ## Background
//!
//! Air pressure drops by roughly 0.12 hPa per metre near the ground, so a
//! 3.5 m storey shows up as a ~0.4 hPa step. The absolute pressure however
//! wanders by several hPa over a day with the weather. Two calibration
//! strategies deal with this, and a deployment picks exactly one:
//!
//! ### Delta Calibration
//!
//! Each floor stores its mean pressure difference to a reference floor. The
//! detector measures the difference between the current filtered pressure
//! and the *anchor* pressure recorded on the current floor, and looks for the
//! floor whose calibrated difference matches it:
//!
//! ```text
//! expected(c) = diff(c) − diff(current)      (re-based onto the current floor)
//! Δ           = p̄ − anchor
//! match       ⇔ |expected(c) − Δ| ≤ τ
//! ```
//!
//! Weather drift cancels out because only short-term differences matter.
//!
//! ### Range Calibration
//!
//! Each floor stores an absolute `[min, max]` pressure range. No anchor is
//! needed, but the ranges must be wide enough to absorb weather drift, which
//! only works in buildings with large storey heights or short deployments.
//!
//! ## Match Rules
//!
//! - Tolerance and range bounds are inclusive.
//! - Several delta candidates within tolerance: the smallest deviation wins,
//!   then the lowest floor number.
//! - Overlapping ranges: the range whose midpoint is closest wins, then the
//!   lowest floor number.
//! - No candidate: `None`. The detector keeps the current floor (delta) or
//!   reports `NoMatchingFloor` (range).
//!
//! ## Usage Example
//!
//! ```rust
//! use floorguard_core::calibration::FloorCalibration;
//!
//! // Ground floor is the reference, upper floors are at lower pressure
//! let calibration = FloorCalibration::delta(0, &[(0, 0.0), (1, -0.42), (2, -0.83)])?;
//!
//! // Standing on floor 0, pressure fell by 0.4 hPa
//! let found = calibration.classify_delta(-0.40, 0, 0.1).map(|m| m.floor);
//! assert_eq!(found, Some(1));
//! # Ok::<(), floorguard_core::DetectorError>(())
//! ```

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    constants::buffers::MAX_CALIBRATED_FLOORS,
    errors::{DetectorError, DetectorResult},
    traits::Validatable,
    Floor,
};

/// Calibrated mean pressure difference of one floor relative to the reference floor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloorDelta {
    /// Floor number in building numbering
    pub floor_number: Floor,

    /// Mean pressure difference to the reference floor
    pub mean_pressure_diff: f32,
}

/// Calibrated absolute pressure range of one floor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FloorRange {
    /// Floor number in building numbering
    pub floor_number: Floor,

    /// Lowest filtered pressure still attributed to this floor
    pub min_pressure: f32,

    /// Highest filtered pressure still attributed to this floor
    pub max_pressure: f32,
}

impl FloorRange {
    /// Inclusive containment check
    pub fn contains(&self, pressure: f32) -> bool {
        self.min_pressure <= pressure && pressure <= self.max_pressure
    }

    /// Centre of the range
    pub fn midpoint(&self) -> f32 {
        (self.min_pressure + self.max_pressure) / 2.0
    }
}

/// Delta calibration entries
pub type DeltaTable = Vec<FloorDelta, MAX_CALIBRATED_FLOORS>;

/// Range calibration entries
pub type RangeTable = Vec<FloorRange, MAX_CALIBRATED_FLOORS>;

/// Which calibration strategy a deployment uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationMode {
    /// Pressure differences relative to a reference floor
    Delta,
    /// Absolute pressure ranges per floor
    Range,
}

/// A floor selected by the classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloorMatch {
    /// Matched floor
    pub floor: Floor,

    /// Distance between observation and calibration (delta deviation or
    /// distance to the range midpoint)
    pub deviation: f32,
}

impl FloorMatch {
    /// True if `self` should win over `other`
    fn beats(&self, other: &FloorMatch) -> bool {
        self.deviation < other.deviation
            || (self.deviation == other.deviation && self.floor < other.floor)
    }
}

/// Calibration table, one variant per calibration strategy
#[derive(Debug, Clone, PartialEq)]
pub enum FloorCalibration {
    /// Mean pressure differences relative to `reference_floor`
    Delta {
        /// Floor the differences are expressed against
        reference_floor: Floor,
        /// Calibrated difference per floor
        diffs: DeltaTable,
    },

    /// Absolute pressure ranges
    Range {
        /// Calibrated range per floor
        ranges: RangeTable,
    },
}

impl FloorCalibration {
    /// Build and validate a delta calibration from `(floor, mean_diff)` pairs
    pub fn delta(reference_floor: Floor, entries: &[(Floor, f32)]) -> DetectorResult<Self> {
        let mut diffs = DeltaTable::new();
        for &(floor_number, mean_pressure_diff) in entries {
            diffs
                .push(FloorDelta { floor_number, mean_pressure_diff })
                .map_err(|_| Self::too_many_floors())?;
        }

        let calibration = Self::Delta { reference_floor, diffs };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Build and validate a range calibration from `(floor, min, max)` triples
    pub fn range(entries: &[(Floor, f32, f32)]) -> DetectorResult<Self> {
        let mut ranges = RangeTable::new();
        for &(floor_number, min_pressure, max_pressure) in entries {
            ranges
                .push(FloorRange { floor_number, min_pressure, max_pressure })
                .map_err(|_| Self::too_many_floors())?;
        }

        let calibration = Self::Range { ranges };
        calibration.validate()?;
        Ok(calibration)
    }

    fn too_many_floors() -> DetectorError {
        DetectorError::Configuration {
            reason: "calibration table exceeds MAX_CALIBRATED_FLOORS",
        }
    }

    /// Check table consistency
    ///
    /// Rejects empty tables, duplicate floor numbers, non-finite values,
    /// inverted ranges, and a delta reference floor missing from the table.
    pub fn validate(&self) -> DetectorResult<()> {
        if self.is_empty() {
            return Err(DetectorError::Configuration {
                reason: "empty calibration table",
            });
        }

        let floors = self.floors();
        for (i, floor) in floors.iter().enumerate() {
            if floors[i + 1..].contains(floor) {
                return Err(DetectorError::Configuration {
                    reason: "duplicate floor number in calibration table",
                });
            }
        }

        match self {
            Self::Delta { reference_floor, diffs } => {
                if diffs.iter().any(|d| !d.mean_pressure_diff.is_valid()) {
                    return Err(DetectorError::Configuration {
                        reason: "non-finite pressure difference in calibration table",
                    });
                }
                if !floors.contains(reference_floor) {
                    return Err(DetectorError::Configuration {
                        reason: "reference floor is not calibrated",
                    });
                }
            }
            Self::Range { ranges } => {
                if ranges
                    .iter()
                    .any(|r| !r.min_pressure.is_valid() || !r.max_pressure.is_valid())
                {
                    return Err(DetectorError::Configuration {
                        reason: "non-finite pressure range in calibration table",
                    });
                }
                if ranges.iter().any(|r| r.min_pressure > r.max_pressure) {
                    return Err(DetectorError::Configuration {
                        reason: "range minimum exceeds maximum",
                    });
                }
            }
        }

        Ok(())
    }

    /// Calibration strategy of this table
    pub fn mode(&self) -> CalibrationMode {
        match self {
            Self::Delta { .. } => CalibrationMode::Delta,
            Self::Range { .. } => CalibrationMode::Range,
        }
    }

    /// Number of calibrated floors
    pub fn len(&self) -> usize {
        match self {
            Self::Delta { diffs, .. } => diffs.len(),
            Self::Range { ranges } => ranges.len(),
        }
    }

    /// True if no floor is calibrated
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calibrated floor numbers in table order
    pub fn floors(&self) -> Vec<Floor, MAX_CALIBRATED_FLOORS> {
        let mut floors = Vec::new();
        match self {
            Self::Delta { diffs, .. } => {
                for d in diffs {
                    let _ = floors.push(d.floor_number);
                }
            }
            Self::Range { ranges } => {
                for r in ranges {
                    let _ = floors.push(r.floor_number);
                }
            }
        }
        floors
    }

    /// True if `floor` has a calibration entry
    pub fn contains(&self, floor: Floor) -> bool {
        match self {
            Self::Delta { diffs, .. } => diffs.iter().any(|d| d.floor_number == floor),
            Self::Range { ranges } => ranges.iter().any(|r| r.floor_number == floor),
        }
    }

    /// Reference floor of a delta calibration
    pub fn reference_floor(&self) -> Option<Floor> {
        match self {
            Self::Delta { reference_floor, .. } => Some(*reference_floor),
            Self::Range { .. } => None,
        }
    }

    /// Calibrated difference of `floor` relative to the reference floor
    pub fn mean_diff(&self, floor: Floor) -> Option<f32> {
        match self {
            Self::Delta { diffs, .. } => diffs
                .iter()
                .find(|d| d.floor_number == floor)
                .map(|d| d.mean_pressure_diff),
            Self::Range { .. } => None,
        }
    }

    /// Calibrated difference of `floor` relative to `current_floor`
    ///
    /// Falls back to the reference floor as base when `current_floor` has no
    /// entry (e.g. the initial floor before anything was detected).
    pub fn rebased_diff(&self, floor: Floor, current_floor: Floor) -> Option<f32> {
        let target = self.mean_diff(floor)?;
        let base = self
            .mean_diff(current_floor)
            .or_else(|| self.reference_floor().and_then(|r| self.mean_diff(r)))
            .unwrap_or(0.0);
        Some(target - base)
    }

    /// Floor whose re-based calibrated difference lies within `tolerance` of `delta`
    ///
    /// Always `None` for range calibrations.
    pub fn classify_delta(&self, delta: f32, current_floor: Floor, tolerance: f32) -> Option<FloorMatch> {
        let Self::Delta { diffs, .. } = self else {
            return None;
        };

        let mut best: Option<FloorMatch> = None;
        for entry in diffs {
            let Some(expected) = self.rebased_diff(entry.floor_number, current_floor) else {
                continue;
            };
            let deviation = libm::fabsf(expected - delta);
            if deviation.is_nan() || deviation > tolerance {
                continue;
            }

            let candidate = FloorMatch { floor: entry.floor_number, deviation };
            if best.map_or(true, |b| candidate.beats(&b)) {
                best = Some(candidate);
            }
        }
        best
    }

    /// Floor whose calibrated range contains `pressure`
    ///
    /// Always `None` for delta calibrations.
    pub fn classify_pressure(&self, pressure: f32) -> Option<FloorMatch> {
        let Self::Range { ranges } = self else {
            return None;
        };

        let mut best: Option<FloorMatch> = None;
        for range in ranges.iter().filter(|r| r.contains(pressure)) {
            let candidate = FloorMatch {
                floor: range.floor_number,
                deviation: libm::fabsf(pressure - range.midpoint()),
            };
            if best.map_or(true, |b| candidate.beats(&b)) {
                best = Some(candidate);
            }
        }
        best
    }
}
