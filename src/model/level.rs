//! Audio level classification
//!
//! Levels are percentages of full scale. The meter bands are:
//!
//! ```text
//!  0          60        80       95   100
//!  |   safe   | caution | danger | peak |
//! ```
//!
//! Each band includes its lower boundary.

use serde::Serialize;

/// Lower bound of the caution band
pub const CAUTION_THRESHOLD: f64 = 60.0;

/// Lower bound of the danger band
pub const DANGER_THRESHOLD: f64 = 80.0;

/// Lower bound of the peak band
pub const PEAK_THRESHOLD: f64 = 95.0;

/// Minimum level value
pub const LEVEL_MIN: f64 = 0.0;

/// Maximum level value
pub const LEVEL_MAX: f64 = 100.0;

/// Meter band of an audio level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LevelClass {
    Safe,
    Caution,
    Danger,
    Peak,
}

impl LevelClass {
    /// Classify a level
    pub fn classify(level: f64) -> Self {
        if level >= PEAK_THRESHOLD {
            LevelClass::Peak
        } else if level >= DANGER_THRESHOLD {
            LevelClass::Danger
        } else if level >= CAUTION_THRESHOLD {
            LevelClass::Caution
        } else {
            LevelClass::Safe
        }
    }

    /// Lowercase label used by the tile meters
    pub fn as_str(&self) -> &'static str {
        match self {
            LevelClass::Safe => "safe",
            LevelClass::Caution => "caution",
            LevelClass::Danger => "danger",
            LevelClass::Peak => "peak",
        }
    }
}

impl std::fmt::Display for LevelClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Clamp a level into `[0, 100]`. NaN collapses to silence.
pub fn clamp_level(level: f64) -> f64 {
    if level.is_nan() {
        LEVEL_MIN
    } else {
        level.clamp(LEVEL_MIN, LEVEL_MAX)
    }
}
