//! Engine runtime: configuration, tick scheduler and the engine facade

pub mod config;
pub mod scheduler;
pub mod service;

pub use config::EngineConfig;
pub use scheduler::Scheduler;
pub use service::TelemetryEngine;
