//! Engine configuration

use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::model::{LayoutDescriptor, SourceDescriptor};
use crate::registry::RegistryConfig;
use crate::telemetry::GeneratorConfig;

/// Engine configuration options
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Period between telemetry ticks
    pub tick_interval: Duration,

    /// Snapshots buffered per channel receiver before it lags
    pub snapshot_channel_capacity: usize,

    /// Registry seeding and telemetry
    pub registry: RegistryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100), // 10 ticks/s
            snapshot_channel_capacity: 16,
            registry: RegistryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Set the tick interval
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the snapshot channel capacity
    pub fn snapshot_channel_capacity(mut self, capacity: usize) -> Self {
        self.snapshot_channel_capacity = capacity;
        self
    }

    /// Replace the source catalog, seeding every entry
    pub fn sources(mut self, sources: Vec<SourceDescriptor>) -> Self {
        self.registry = self.registry.sources(sources);
        self
    }

    /// Set how many catalog entries are seeded
    pub fn seed_count(mut self, count: usize) -> Self {
        self.registry = self.registry.seed_count(count);
        self
    }

    /// Set the startup layout
    pub fn initial_layout(mut self, layout: LayoutDescriptor) -> Self {
        self.registry = self.registry.initial_layout(layout);
        self
    }

    /// Set the startup master volume
    pub fn master_volume(mut self, volume: f64) -> Self {
        self.registry = self.registry.master_volume(volume);
        self
    }

    /// Use a fixed RNG seed
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.registry = self.registry.rng_seed(seed);
        self
    }

    /// Set telemetry tunables
    pub fn generator(mut self, generator: GeneratorConfig) -> Self {
        self.registry = self.registry.generator(generator);
        self
    }

    /// Reject malformed configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_engine()?;
        self.registry.validate()
    }

    /// Check the tick interval and channel capacity only, ignoring the
    /// nested registry settings
    pub fn validate_engine(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.snapshot_channel_capacity == 0 {
            return Err(ConfigError::NonPositive {
                name: "snapshot_channel_capacity",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.tick_interval, Duration::from_millis(100));
        assert_eq!(config.snapshot_channel_capacity, 16);
        assert_eq!(config.registry.seed_count, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_chaining() {
        let config = EngineConfig::default()
            .tick_interval(Duration::from_millis(40))
            .snapshot_channel_capacity(4)
            .seed_count(5)
            .initial_layout(LayoutDescriptor::grid_2x2())
            .master_volume(50.0)
            .rng_seed(42);

        assert_eq!(config.tick_interval, Duration::from_millis(40));
        assert_eq!(config.snapshot_channel_capacity, 4);
        assert_eq!(config.registry.seed_count, 5);
        assert_eq!(config.registry.initial_layout.id(), "2x2");
        assert_eq!(config.registry.master_volume, 50.0);
        assert_eq!(config.registry.rng_seed, Some(42));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = EngineConfig::default().tick_interval(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = EngineConfig::default().snapshot_channel_capacity(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sources_sets_seed_count() {
        let config = EngineConfig::default().sources(vec![
            SourceDescriptor::new("a", "A", "udp://a"),
            SourceDescriptor::new("b", "B", "udp://b"),
        ]);
        assert_eq!(config.registry.seed_count, 2);
        assert!(config.validate().is_ok());
    }
}
