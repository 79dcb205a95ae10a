//! Telemetry generation
//!
//! Seeding and per-tick evolution of record metrics. Levels random-walk
//! within `[0, 100]` with occasional transients; bitrate and latency drift
//! rarely; a resolution change re-seeds bitrate into the pixel-count tier.

pub mod config;
pub mod generator;

pub use config::{GeneratorConfig, MAX_BITRATE_STEP};
pub use generator::{apply_resolution, drift_record, seed_record, BitrateTier};
