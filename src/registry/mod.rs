//! Stream registry
//!
//! Holds the authoritative model of every feed and the operator mutation
//! API. Records are created once from the source catalog and only their
//! fields change afterwards.
//!
//! # Architecture
//!
//! ```text
//!                 Arc<TelemetryEngine>
//!            ┌──────────────────────────────┐
//!            │ state: RwLock<EngineState {  │
//!            │   records: Vec<StreamRecord>,│
//!            │   layout, selected, ...      │
//!            │ }>                           │
//!            └──────┬─────────────────┬─────┘
//!                   │                 │
//!        write lock │                 │ write lock
//!                   ▼                 ▼
//!             [Scheduler]       [Operator input]
//!             tick()            toggle_mute(), set_layout(), ...
//!                   │
//!                   └──► SubscriptionHub::broadcast(snapshot)
//! ```
//!
//! Only one writer holds the state at a time, so a tick is never interleaved
//! with a mutation and observers never see a half-updated snapshot.

pub mod config;
pub mod store;

pub use config::RegistryConfig;
pub use store::EngineState;
