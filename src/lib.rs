//! Simulated stream telemetry for multi-viewer monitoring grids
//!
//! `gridwatch` keeps an in-memory model of every feed in a monitoring wall,
//! drifts its audio levels, bitrate and latency on a fixed tick, and fans the
//! resulting snapshot out to observers. A rendering layer reads snapshots,
//! builds grid slots from them and forwards operator actions (mute, source
//! swap, layout change, ...) back into the engine.
//!
//! No media is touched: the telemetry is simulated.
//!
//! # Example
//!
//! ```no_run
//! use gridwatch::{EngineConfig, TelemetryEngine};
//!
//! # async fn run() -> gridwatch::Result<()> {
//! let engine = TelemetryEngine::initialize(EngineConfig::default())?;
//!
//! let subscription = engine.subscribe(|streams| {
//!     for stream in streams {
//!         println!("{} peak={:.1}", stream.display_name(), stream.peak_level());
//!     }
//! });
//!
//! engine.toggle_mute("cam-1").await;
//! engine.set_layout_by_id("2x2").await;
//!
//! subscription.unsubscribe();
//! engine.shutdown();
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod hub;
pub mod model;
pub mod registry;
pub mod telemetry;
pub mod view;

pub use engine::{EngineConfig, TelemetryEngine};
pub use error::{ConfigError, Result};
pub use hub::{Snapshot, Subscription, SubscriptionHub};
pub use model::{
    LayoutDescriptor, LevelClass, Resolution, SourceDescriptor, StreamRecord, StreamStatus,
};
pub use registry::{EngineState, RegistryConfig};
pub use view::{build_slots, GridSummary, Slot};
