//! Telemetry engine
//!
//! Owns the registry, the subscription hub and the scheduler. Share it as
//! `Arc<TelemetryEngine>` with whatever renders the grid.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use tokio::sync::{broadcast, RwLock};

use super::config::EngineConfig;
use super::scheduler::Scheduler;
use crate::error::Result;
use crate::hub::{Snapshot, Subscription, SubscriptionHub};
use crate::model::{LayoutDescriptor, Resolution, StreamRecord};
use crate::registry::EngineState;
use crate::view::{self, GridSummary, Slot};

/// Stream telemetry state engine
///
/// Ticks and mutations both take the state write lock, so exactly one of
/// them changes the registry at any instant. A tick downgrades to a read
/// lock while broadcasting, which keeps broadcasts in tick order.
pub struct TelemetryEngine {
    state: RwLock<EngineState>,
    hub: SubscriptionHub,
    scheduler: Scheduler,
}

impl TelemetryEngine {
    /// Validate the configuration and seed the registry
    ///
    /// The scheduler is not started; see [`start`](Self::start).
    pub fn new(config: EngineConfig) -> Result<Arc<Self>> {
        config.validate()?;
        let state = EngineState::new(&config.registry)?;

        tracing::info!(
            streams = state.len(),
            layout = state.layout().id(),
            tick_ms = config.tick_interval.as_millis() as u64,
            "Telemetry engine created"
        );

        Ok(Arc::new(Self {
            state: RwLock::new(state),
            hub: SubscriptionHub::new(config.snapshot_channel_capacity),
            scheduler: Scheduler::new(config.tick_interval),
        }))
    }

    /// Build the engine around an existing state
    ///
    /// Only the engine-level settings of `config` apply; its registry
    /// section is ignored because the state is already built.
    pub fn with_state(state: EngineState, config: &EngineConfig) -> Result<Arc<Self>> {
        config.validate_engine()?;

        Ok(Arc::new(Self {
            state: RwLock::new(state),
            hub: SubscriptionHub::new(config.snapshot_channel_capacity),
            scheduler: Scheduler::new(config.tick_interval),
        }))
    }

    /// Seed the registry and start ticking
    ///
    /// Must be called from within a Tokio runtime for ticks to run.
    pub fn initialize(config: EngineConfig) -> Result<Arc<Self>> {
        let engine = Self::new(config)?;
        engine.start();
        Ok(engine)
    }

    /// Start the scheduler; no-op if already running
    pub fn start(self: &Arc<Self>) -> bool {
        let engine: Weak<Self> = Arc::downgrade(self);

        self.scheduler.start(move || {
            let engine = engine.clone();
            async move {
                match engine.upgrade() {
                    Some(engine) => {
                        engine.tick().await;
                        true
                    }
                    None => false,
                }
            }
        })
    }

    /// Stop the scheduler and drop all callback observers
    ///
    /// Safe to call repeatedly or before `start`.
    pub fn shutdown(&self) {
        let was_running = self.scheduler.stop();
        self.hub.clear();

        if was_running {
            tracing::info!("Telemetry engine shut down");
        }
    }

    /// Whether the scheduler is ticking
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Run one tick: drift every record, then broadcast the snapshot
    ///
    /// Returns the number of callback observers reached.
    pub async fn tick(&self) -> usize {
        let mut state = self.state.write().await;
        let snapshot: Snapshot = Arc::new(state.tick());
        let tick = state.tick_count();

        let _state = state.downgrade();
        let delivered = self.hub.broadcast(snapshot);

        tracing::trace!(tick = tick, delivered = delivered, "Tick broadcast");
        delivered
    }

    /// Register a callback for every post-tick snapshot
    #[must_use = "dropping the Subscription makes the observer impossible to remove"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&[StreamRecord]) + Send + Sync + 'static,
    {
        self.hub.subscribe(observer)
    }

    /// Receive every post-tick snapshot over a broadcast channel
    pub fn subscribe_channel(&self) -> broadcast::Receiver<Snapshot> {
        self.hub.subscribe_channel()
    }

    /// Number of callback observers
    pub fn observer_count(&self) -> usize {
        self.hub.observer_count()
    }

    /// Copy of all records in registry order
    pub async fn get_streams(&self) -> Vec<StreamRecord> {
        self.state.read().await.snapshot()
    }

    /// Copy of one record
    pub async fn get_stream(&self, id: &str) -> Option<StreamRecord> {
        self.state.read().await.get(id).cloned()
    }

    pub async fn layout(&self) -> LayoutDescriptor {
        self.state.read().await.layout().clone()
    }

    pub async fn selected(&self) -> Option<String> {
        self.state.read().await.selected().map(str::to_string)
    }

    pub async fn global_muted(&self) -> bool {
        self.state.read().await.global_muted()
    }

    pub async fn master_volume(&self) -> f64 {
        self.state.read().await.master_volume()
    }

    /// Completed ticks since creation
    pub async fn tick_count(&self) -> u64 {
        self.state.read().await.tick_count()
    }

    /// Slot requests made through [`assign_to_position`](Self::assign_to_position)
    pub async fn position_assignments(&self) -> HashMap<String, usize> {
        self.state.read().await.assignments().clone()
    }

    /// Grid slots for the active layout
    pub async fn slots(&self) -> Vec<Slot> {
        let state = self.state.read().await;
        view::build_slots(state.records(), state.layout())
    }

    /// Aggregate counts over the registry
    pub async fn summary(&self) -> GridSummary {
        let state = self.state.read().await;
        GridSummary::from_state(&state)
    }

    pub async fn toggle_mute(&self, id: &str) -> bool {
        self.state.write().await.toggle_mute(id)
    }

    pub async fn toggle_visibility(&self, id: &str) -> bool {
        self.state.write().await.toggle_visibility(id)
    }

    pub async fn change_source(&self, id: &str, source_id: &str) -> bool {
        self.state.write().await.change_source(id, source_id)
    }

    pub async fn change_resolution(&self, id: &str, resolution: Resolution) -> bool {
        self.state.write().await.change_resolution(id, resolution)
    }

    pub async fn set_layout(&self, layout: LayoutDescriptor) {
        self.state.write().await.set_layout(layout);
    }

    /// Switch to a catalog layout by id; unknown ids are ignored
    pub async fn set_layout_by_id(&self, layout_id: &str) -> bool {
        match LayoutDescriptor::by_id(layout_id) {
            Some(layout) => {
                self.set_layout(layout).await;
                true
            }
            None => {
                tracing::warn!(layout = layout_id, "Unknown layout id");
                false
            }
        }
    }

    pub async fn toggle_select(&self, id: &str) -> bool {
        self.state.write().await.toggle_select(id)
    }

    /// Flip global mute; returns the new flag
    pub async fn toggle_global_mute(&self) -> bool {
        self.state.write().await.toggle_global_mute()
    }

    pub async fn set_master_volume(&self, volume: f64) {
        self.state.write().await.set_master_volume(volume);
    }

    pub async fn assign_to_position(&self, id: &str, position: usize) -> bool {
        self.state.write().await.assign_to_position(id, position)
    }
}

impl Drop for TelemetryEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
