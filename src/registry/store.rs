//! Registry state and mutation API
//!
//! [`EngineState`] is the canonical model: records in insertion order, the
//! active layout, selection, global mute and master volume. Every method is
//! synchronous and bounded. Callers that share it across tasks wrap it in a
//! lock; [`TelemetryEngine`](crate::engine::TelemetryEngine) does exactly
//! that.
//!
//! Operations addressed to an unknown stream id change nothing and return
//! `false`.

use std::collections::HashMap;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::config::RegistryConfig;
use crate::error::{ConfigError, Result};
use crate::model::{LayoutDescriptor, Resolution, StreamRecord};
use crate::telemetry::{self, GeneratorConfig};

/// Canonical engine state
#[derive(Debug)]
pub struct EngineState {
    /// Records in registry (display) order
    records: Vec<StreamRecord>,

    /// Stream id to position in `records`
    index: HashMap<String, usize>,

    /// Source id to label, for source swaps
    source_labels: HashMap<String, String>,

    layout: LayoutDescriptor,
    selected: Option<String>,
    global_muted: bool,
    master_volume: f64,

    /// Requested slot per stream id; not consulted by the view builder
    assignments: HashMap<String, usize>,

    generator: GeneratorConfig,
    rng: StdRng,
    tick_count: u64,
}

impl EngineState {
    /// Validate the configuration and seed the registry
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let now = Utc::now();
        let records = config.sources[..config.seed_count]
            .iter()
            .map(|source| telemetry::seed_record(source, &config.generator, &mut rng, now))
            .collect();

        let source_labels = config
            .sources
            .iter()
            .map(|source| (source.id.clone(), source.label.clone()))
            .collect();

        Self::assemble(records, source_labels, config, rng)
    }

    /// Build state around pre-made records
    ///
    /// Duplicate record ids are rejected.
    pub fn with_records(records: Vec<StreamRecord>, config: &RegistryConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let source_labels = config
            .sources
            .iter()
            .map(|source| (source.id.clone(), source.label.clone()))
            .collect();

        Self::assemble(records, source_labels, config, rng)
    }

    fn assemble(
        records: Vec<StreamRecord>,
        source_labels: HashMap<String, String>,
        config: &RegistryConfig,
        rng: StdRng,
    ) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id().to_string(), position).is_some() {
                return Err(ConfigError::DuplicateStreamId(record.id().to_string()));
            }
        }

        Ok(Self {
            records,
            index,
            source_labels,
            layout: config.initial_layout.clone(),
            selected: None,
            global_muted: false,
            master_volume: config.master_volume,
            assignments: HashMap::new(),
            generator: config.generator.clone(),
            rng,
            tick_count: 0,
        })
    }

    /// Advance every record by one tick
    ///
    /// Returns the post-tick snapshot.
    pub fn tick(&mut self) -> Vec<StreamRecord> {
        let now = Utc::now();
        for record in self.records.iter_mut() {
            telemetry::drift_record(record, &self.generator, &mut self.rng, now);
        }
        self.tick_count += 1;
        self.records.clone()
    }

    /// Copy of all records in registry order
    pub fn snapshot(&self) -> Vec<StreamRecord> {
        self.records.clone()
    }

    /// Records in registry order
    pub fn records(&self) -> &[StreamRecord] {
        &self.records
    }

    /// Look up a record by id
    pub fn get(&self, id: &str) -> Option<&StreamRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// Registry-order position of a stream
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn layout(&self) -> &LayoutDescriptor {
        &self.layout
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn global_muted(&self) -> bool {
        self.global_muted
    }

    pub fn master_volume(&self) -> f64 {
        self.master_volume
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Recorded slot assignments, by stream id
    pub fn assignments(&self) -> &HashMap<String, usize> {
        &self.assignments
    }

    fn record_mut(&mut self, id: &str) -> Option<&mut StreamRecord> {
        match self.index.get(id) {
            Some(&position) => self.records.get_mut(position),
            None => {
                tracing::debug!(stream = id, "Ignoring operation on unknown stream");
                None
            }
        }
    }

    /// Flip a stream's mute flag
    pub fn toggle_mute(&mut self, id: &str) -> bool {
        let Some(record) = self.record_mut(id) else {
            return false;
        };

        let muted = !record.audio().muted();
        record.audio_mut().set_muted(muted);
        record.touch(Utc::now());

        tracing::debug!(stream = id, muted = muted, "Mute toggled");
        true
    }

    /// Flip a stream's visibility; telemetry keeps running while hidden
    pub fn toggle_visibility(&mut self, id: &str) -> bool {
        let Some(record) = self.record_mut(id) else {
            return false;
        };

        let visible = !record.visible();
        record.set_visible(visible);
        record.touch(Utc::now());

        tracing::debug!(stream = id, visible = visible, "Visibility toggled");
        true
    }

    /// Point a stream at another source
    ///
    /// The display name follows the source label when the source is in the
    /// catalog and is left alone otherwise.
    pub fn change_source(&mut self, id: &str, source_id: &str) -> bool {
        let label = self.source_labels.get(source_id).cloned();
        let Some(record) = self.record_mut(id) else {
            return false;
        };

        let renamed = label.is_some();
        record.set_source(source_id.to_string(), label);
        record.touch(Utc::now());

        tracing::debug!(stream = id, source = source_id, renamed = renamed, "Source changed");
        true
    }

    /// Replace a stream's resolution and re-seed its bitrate
    ///
    /// Zero-area resolutions are refused.
    pub fn change_resolution(&mut self, id: &str, resolution: Resolution) -> bool {
        let Some(&position) = self.index.get(id) else {
            tracing::debug!(stream = id, "Ignoring operation on unknown stream");
            return false;
        };
        if resolution.pixel_count() == 0 {
            tracing::debug!(stream = id, resolution = %resolution, "Ignoring zero-area resolution");
            return false;
        }

        let record = &mut self.records[position];
        telemetry::apply_resolution(record, resolution, &mut self.rng, Utc::now());

        tracing::debug!(
            stream = id,
            resolution = %resolution,
            bitrate_mbps = record.bitrate_mbps(),
            "Resolution changed"
        );
        true
    }

    /// Switch layout, dropping a selection that no longer has a slot
    pub fn set_layout(&mut self, layout: LayoutDescriptor) {
        let tiles = layout.total_tiles();
        self.layout = layout;

        let off_grid = self
            .selected
            .as_deref()
            .and_then(|id| self.index_of(id))
            .is_some_and(|position| position >= tiles);
        if off_grid {
            tracing::debug!(selected = ?self.selected, tiles = tiles, "Selection cleared by layout change");
            self.selected = None;
        }

        tracing::info!(layout = self.layout.id(), tiles = tiles, "Layout changed");
    }

    /// Select a stream, or clear the selection if it is already selected
    pub fn toggle_select(&mut self, id: &str) -> bool {
        if !self.index.contains_key(id) {
            tracing::debug!(stream = id, "Ignoring operation on unknown stream");
            return false;
        }

        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        } else {
            self.selected = Some(id.to_string());
        }

        tracing::debug!(selected = ?self.selected, "Selection changed");
        true
    }

    /// Flip the global mute flag and copy it onto every stream once
    pub fn toggle_global_mute(&mut self) -> bool {
        self.global_muted = !self.global_muted;

        let now = Utc::now();
        for record in self.records.iter_mut() {
            record.audio_mut().set_muted(self.global_muted);
            record.touch(now);
        }

        tracing::info!(muted = self.global_muted, streams = self.records.len(), "Global mute toggled");
        self.global_muted
    }

    /// Store the master volume, clamped to `[0, 100]`
    ///
    /// Levels are not scaled by it. NaN is ignored.
    pub fn set_master_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        self.master_volume = volume.clamp(0.0, 100.0);
        tracing::debug!(volume = self.master_volume, "Master volume set");
    }

    /// Record a request to place a stream in a grid slot
    ///
    /// The view builder keeps registry order regardless.
    pub fn assign_to_position(&mut self, id: &str, position: usize) -> bool {
        if !self.index.contains_key(id) {
            tracing::debug!(stream = id, "Ignoring operation on unknown stream");
            return false;
        }

        self.assignments.insert(id.to_string(), position);
        tracing::debug!(stream = id, position = position, "Position assigned");
        true
    }
}
