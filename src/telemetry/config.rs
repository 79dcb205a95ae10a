//! Telemetry generator tunables

use crate::error::{ConfigError, Result};
use crate::model::level::LEVEL_MAX;

/// Upper bound for `bitrate_step`, in Mbps
pub const MAX_BITRATE_STEP: f64 = 100.0;

/// Drift and seeding parameters for simulated telemetry
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Maximum per-tick level change in either direction
    pub level_step: f64,

    /// Chance per channel per tick of snapping to peak or silence
    pub transient_probability: f64,

    /// Chance per tick that bitrate (and, independently, latency) drifts
    pub metric_drift_probability: f64,

    /// Maximum bitrate change per drift, in Mbps
    pub bitrate_step: f64,

    /// Maximum latency change per drift, in ms
    pub latency_step: u32,

    /// Latency never drifts below this
    pub min_latency_ms: u32,

    /// Chance a seeded record starts active rather than inactive
    pub active_probability: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            level_step: 5.0,
            transient_probability: 0.05,
            metric_drift_probability: 0.10,
            bitrate_step: 0.5,
            latency_step: 5,
            min_latency_ms: 5,
            active_probability: 0.9,
        }
    }
}

impl GeneratorConfig {
    /// Set the per-tick level step
    pub fn level_step(mut self, step: f64) -> Self {
        self.level_step = step;
        self
    }

    /// Set the transient probability
    pub fn transient_probability(mut self, p: f64) -> Self {
        self.transient_probability = p;
        self
    }

    /// Set the bitrate/latency drift probability
    pub fn metric_drift_probability(mut self, p: f64) -> Self {
        self.metric_drift_probability = p;
        self
    }

    /// Set the latency floor
    pub fn min_latency_ms(mut self, floor: u32) -> Self {
        self.min_latency_ms = floor;
        self
    }

    /// Set the seeding active probability
    pub fn active_probability(mut self, p: f64) -> Self {
        self.active_probability = p;
        self
    }

    /// Set the per-drift bitrate step
    pub fn bitrate_step(mut self, step: f64) -> Self {
        self.bitrate_step = step;
        self
    }

    /// Reject out-of-range probabilities and steps
    ///
    /// Steps must be finite, positive and bounded: `level_step` by the full
    /// meter scale, `bitrate_step` by [`MAX_BITRATE_STEP`].
    pub fn validate(&self) -> Result<()> {
        check_probability("transient_probability", self.transient_probability)?;
        check_probability("metric_drift_probability", self.metric_drift_probability)?;
        check_probability("active_probability", self.active_probability)?;

        check_step("level_step", self.level_step, LEVEL_MAX)?;
        check_step("bitrate_step", self.bitrate_step, MAX_BITRATE_STEP)?;
        if self.latency_step == 0 {
            return Err(ConfigError::NonPositive {
                name: "latency_step",
            });
        }
        if self.min_latency_ms == 0 {
            return Err(ConfigError::NonPositive {
                name: "min_latency_ms",
            });
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}

fn check_step(name: &'static str, value: f64, max: f64) -> Result<()> {
    if value.is_nan() || value <= 0.0 {
        Err(ConfigError::NonPositive { name })
    } else if !value.is_finite() || value > max {
        Err(ConfigError::StepTooLarge { name, value, max })
    } else {
        Ok(())
    }
}
