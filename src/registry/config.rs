//! Registry configuration

use crate::error::{ConfigError, Result};
use crate::model::{default_catalog, LayoutDescriptor, SourceDescriptor};
use crate::telemetry::GeneratorConfig;

/// Configuration for the stream registry
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Known sources. The first `seed_count` become records; all of them are
    /// valid targets for a source swap.
    pub sources: Vec<SourceDescriptor>,

    /// Number of records seeded from the head of `sources`
    pub seed_count: usize,

    /// Layout active at startup
    pub initial_layout: LayoutDescriptor,

    /// Master volume at startup (0-100)
    pub master_volume: f64,

    /// Fixed RNG seed for reproducible telemetry (None = OS entropy)
    pub rng_seed: Option<u64>,

    /// Telemetry tunables
    pub generator: GeneratorConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            sources: default_catalog(),
            seed_count: 9,
            initial_layout: LayoutDescriptor::grid_3x3(),
            master_volume: 75.0,
            rng_seed: None,
            generator: GeneratorConfig::default(),
        }
    }
}

impl RegistryConfig {
    /// Replace the source catalog, seeding every entry
    pub fn sources(mut self, sources: Vec<SourceDescriptor>) -> Self {
        self.seed_count = sources.len();
        self.sources = sources;
        self
    }

    /// Set how many catalog entries are seeded
    pub fn seed_count(mut self, count: usize) -> Self {
        self.seed_count = count;
        self
    }

    /// Set the startup layout
    pub fn initial_layout(mut self, layout: LayoutDescriptor) -> Self {
        self.initial_layout = layout;
        self
    }

    /// Set the startup master volume
    pub fn master_volume(mut self, volume: f64) -> Self {
        self.master_volume = volume;
        self
    }

    /// Use a fixed RNG seed
    pub fn rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Set telemetry tunables
    pub fn generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    /// Reject configuration that would corrupt registry invariants
    pub fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::with_capacity(self.sources.len());
        for (index, source) in self.sources.iter().enumerate() {
            if source.id.is_empty() {
                return Err(ConfigError::EmptyStreamId(index));
            }
            if !seen.insert(source.id.as_str()) {
                return Err(ConfigError::DuplicateStreamId(source.id.clone()));
            }
        }

        if self.seed_count > self.sources.len() {
            return Err(ConfigError::SeedCountTooLarge {
                requested: self.seed_count,
                available: self.sources.len(),
            });
        }

        if !(0.0..=100.0).contains(&self.master_volume) {
            return Err(ConfigError::InvalidVolume(self.master_volume));
        }

        self.generator.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.seed_count, 9);
        assert_eq!(config.sources.len(), 12);
        assert_eq!(config.initial_layout.id(), "3x3");
        assert_eq!(config.master_volume, 75.0);
        assert!(config.rng_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let config = RegistryConfig::default().sources(vec![
            SourceDescriptor::new("cam-1", "A", "udp://a"),
            SourceDescriptor::new("cam-1", "B", "udp://b"),
        ]);
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateStreamId("cam-1".into()))
        );
    }

    #[test]
    fn test_rejects_empty_id() {
        let config = RegistryConfig::default()
            .sources(vec![SourceDescriptor::new("", "A", "udp://a")]);
        assert_eq!(config.validate(), Err(ConfigError::EmptyStreamId(0)));
    }

    #[test]
    fn test_rejects_seed_count_overflow() {
        let config = RegistryConfig::default().seed_count(13);
        assert_eq!(
            config.validate(),
            Err(ConfigError::SeedCountTooLarge {
                requested: 13,
                available: 12
            })
        );
    }

    #[test]
    fn test_rejects_volume_out_of_range() {
        assert!(RegistryConfig::default().master_volume(-1.0).validate().is_err());
        assert!(RegistryConfig::default().master_volume(100.5).validate().is_err());
        assert!(RegistryConfig::default().master_volume(100.0).validate().is_ok());
    }

    #[test]
    fn test_propagates_generator_errors() {
        let config = RegistryConfig::default()
            .generator(GeneratorConfig::default().transient_probability(-0.1));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidProbability { .. })
        ));
    }
}
