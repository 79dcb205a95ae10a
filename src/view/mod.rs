//! Derived views for the rendering layer
//!
//! Pure functions over a registry snapshot and a layout. Nothing here
//! mutates engine state or caches results.

pub mod slots;
pub mod summary;

pub use slots::{build_slots, Slot};
pub use summary::GridSummary;
