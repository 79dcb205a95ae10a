//! Error types
//!
//! Runtime operations on the engine never fail: unknown stream ids are
//! no-ops and observer panics are isolated. The only errors are raised while
//! building configuration, before any state exists.

use thiserror::Error;

/// Result type for configuration and construction
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Rejected engine or layout configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Tick interval must be non-zero
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,

    /// Two sources share an id
    #[error("duplicate stream id in source catalog: {0}")]
    DuplicateStreamId(String),

    /// A source has an empty id
    #[error("source at index {0} has an empty id")]
    EmptyStreamId(usize),

    /// More records requested than the catalog holds
    #[error("seed count {requested} exceeds source catalog size {available}")]
    SeedCountTooLarge { requested: usize, available: usize },

    /// Layout dimensions must be positive
    #[error("layout {id} has invalid dimensions {rows}x{cols}")]
    InvalidLayout { id: String, rows: u32, cols: u32 },

    /// Resolution dimensions must be positive
    #[error("invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    /// A probability outside [0, 1]
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    /// A step or floor that must be strictly positive
    #[error("{name} must be positive")]
    NonPositive { name: &'static str },

    /// A step that is infinite or larger than its bound
    #[error("{name} must be at most {max}, got {value}")]
    StepTooLarge {
        name: &'static str,
        value: f64,
        max: f64,
    },

    /// Master volume outside [0, 100]
    #[error("master volume must be within [0, 100], got {0}")]
    InvalidVolume(f64),
}
