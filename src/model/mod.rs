//! Entity model: stream records, grid layouts, sources and audio meter bands

pub mod layout;
pub mod level;
pub mod record;
pub mod source;

pub use layout::LayoutDescriptor;
pub use level::{LevelClass, CAUTION_THRESHOLD, DANGER_THRESHOLD, PEAK_THRESHOLD};
pub use record::{
    normalize_levels, AudioState, Resolution, StreamRecord, StreamStatus, METER_CHANNELS,
};
pub use source::{default_catalog, SourceDescriptor};
