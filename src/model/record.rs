//! Stream record types
//!
//! A [`StreamRecord`] is one monitored feed. Callers only ever hold copies;
//! fields are read through accessors and written by the engine.
//! `status` is owned by the telemetry generator and has no public setter.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::level::{clamp_level, LevelClass};
use crate::error::{ConfigError, Result};

/// Number of logical meter channels per record
pub const METER_CHANNELS: usize = 4;

/// Health of a feed as reported by telemetry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StreamStatus {
    Active,
    Inactive,
    Error,
    Buffering,
}

impl StreamStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamStatus::Active => "active",
            StreamStatus::Inactive => "inactive",
            StreamStatus::Error => "error",
            StreamStatus::Buffering => "buffering",
        }
    }
}

impl std::fmt::Display for StreamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Video frame dimensions
///
/// Built through [`Resolution::new`] or the constants, so both dimensions are
/// positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    /// 1280 x 720
    pub const HD_720: Resolution = Resolution {
        width: 1280,
        height: 720,
    };

    /// 1920 x 1080
    pub const HD_1080: Resolution = Resolution {
        width: 1920,
        height: 1080,
    };

    /// 3840 x 2160
    pub const UHD_4K: Resolution = Resolution {
        width: 3840,
        height: 2160,
    };

    /// Placeholder dimensions for empty grid slots
    pub(crate) const NONE: Resolution = Resolution {
        width: 0,
        height: 0,
    };

    /// Create a resolution, rejecting zero dimensions
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidResolution { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total pixel count
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Per-feed audio state
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioState {
    channel_count: u8,
    sample_rate_hz: u32,
    levels: [f64; METER_CHANNELS],
    muted: bool,
}

impl AudioState {
    /// Create audio state, normalizing `levels` to the meter channel count
    pub fn new(channel_count: u8, sample_rate_hz: u32, levels: &[f64], muted: bool) -> Self {
        Self {
            channel_count,
            sample_rate_hz,
            levels: normalize_levels(levels),
            muted,
        }
    }

    /// Declared channel count of the feed (independent of meter channels)
    pub fn channel_count(&self) -> u8 {
        self.channel_count
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Meter levels, always exactly [`METER_CHANNELS`] entries in `[0, 100]`
    pub fn levels(&self) -> &[f64; METER_CHANNELS] {
        &self.levels
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub(crate) fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub(crate) fn levels_mut(&mut self) -> &mut [f64; METER_CHANNELS] {
        &mut self.levels
    }
}

/// Zero-pad or truncate to the meter channel count, clamping each entry
pub fn normalize_levels(levels: &[f64]) -> [f64; METER_CHANNELS] {
    let mut normalized = [0.0; METER_CHANNELS];
    for (slot, level) in normalized.iter_mut().zip(levels) {
        *slot = clamp_level(*level);
    }
    normalized
}

/// One monitored feed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRecord {
    id: String,
    display_name: String,
    endpoint: String,
    status: StreamStatus,
    resolution: Resolution,
    bitrate_mbps: f64,
    latency_ms: u32,
    frame_rate: f64,
    audio: AudioState,
    last_update: DateTime<Utc>,
    visible: bool,
    source_id: String,
}

/// Construction parameters for a [`StreamRecord`]
#[derive(Debug, Clone)]
pub(crate) struct RecordParts {
    pub id: String,
    pub display_name: String,
    pub endpoint: String,
    pub status: StreamStatus,
    pub resolution: Resolution,
    pub bitrate_mbps: f64,
    pub latency_ms: u32,
    pub frame_rate: f64,
    pub audio: AudioState,
    pub last_update: DateTime<Utc>,
}

impl StreamRecord {
    /// Build a visible record whose source is itself
    pub(crate) fn from_parts(parts: RecordParts) -> Self {
        Self {
            source_id: parts.id.clone(),
            id: parts.id,
            display_name: parts.display_name,
            endpoint: parts.endpoint,
            status: parts.status,
            resolution: parts.resolution,
            bitrate_mbps: parts.bitrate_mbps.max(0.0),
            latency_ms: parts.latency_ms,
            frame_rate: parts.frame_rate,
            audio: parts.audio,
            last_update: parts.last_update,
            visible: true,
        }
    }

    /// Empty grid slot filler
    ///
    /// Zeroed metrics, muted, inactive, visible, stamped at the Unix epoch.
    pub fn placeholder(index: usize) -> Self {
        Self {
            id: format!("empty-{index}"),
            display_name: String::new(),
            endpoint: String::new(),
            status: StreamStatus::Inactive,
            resolution: Resolution::NONE,
            bitrate_mbps: 0.0,
            latency_ms: 0,
            frame_rate: 0.0,
            audio: AudioState::new(0, 0, &[], true),
            last_update: DateTime::<Utc>::default(),
            visible: true,
            source_id: String::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Opaque origin reference, never dereferenced
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Telemetry-reported status (read-only to callers)
    pub fn status(&self) -> StreamStatus {
        self.status
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn bitrate_mbps(&self) -> f64 {
        self.bitrate_mbps
    }

    pub fn latency_ms(&self) -> u32 {
        self.latency_ms
    }

    pub fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    pub fn audio(&self) -> &AudioState {
        &self.audio
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    pub fn is_active(&self) -> bool {
        self.status == StreamStatus::Active
    }

    /// Loudest meter level
    pub fn peak_level(&self) -> f64 {
        self.audio.levels.iter().copied().fold(0.0, f64::max)
    }

    /// Meter band of each channel
    pub fn level_classes(&self) -> [LevelClass; METER_CHANNELS] {
        self.audio.levels.map(LevelClass::classify)
    }

    pub(crate) fn audio_mut(&mut self) -> &mut AudioState {
        &mut self.audio
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_source(&mut self, source_id: String, display_name: Option<String>) {
        self.source_id = source_id;
        if let Some(name) = display_name {
            self.display_name = name;
        }
    }

    pub(crate) fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    pub(crate) fn set_bitrate_mbps(&mut self, bitrate: f64) {
        self.bitrate_mbps = bitrate.max(0.0);
    }

    pub(crate) fn set_latency_ms(&mut self, latency: u32) {
        self.latency_ms = latency;
    }

    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.last_update = now;
    }
}

#[cfg(test)]
pub(crate) fn test_record(id: &str) -> StreamRecord {
    StreamRecord::from_parts(RecordParts {
        id: id.to_string(),
        display_name: format!("Feed {id}"),
        endpoint: format!("udp://239.0.0.1:5004/{id}"),
        status: StreamStatus::Active,
        resolution: Resolution::HD_1080,
        bitrate_mbps: 12.0,
        latency_ms: 40,
        frame_rate: 50.0,
        audio: AudioState::new(2, 48_000, &[10.0, 20.0, 30.0, 40.0], false),
        last_update: DateTime::<Utc>::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pads_short_input() {
        let audio = AudioState::new(1, 48_000, &[42.0], false);
        assert_eq!(audio.levels(), &[42.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalize_truncates_and_clamps() {
        let levels = normalize_levels(&[10.0, 120.0, -5.0, 50.0, 70.0, 80.0, 90.0, 99.0]);
        assert_eq!(levels, [10.0, 100.0, 0.0, 50.0]);
    }

    #[test]
    fn test_record_defaults() {
        let record = test_record("cam-1");
        assert_eq!(record.source_id(), "cam-1");
        assert!(record.visible());
        assert!(!record.audio().muted());
        assert!(record.is_active());
    }

    #[test]
    fn test_placeholder() {
        let slot = StreamRecord::placeholder(7);
        assert_eq!(slot.id(), "empty-7");
        assert_eq!(slot.status(), StreamStatus::Inactive);
        assert!(slot.audio().muted());
        assert!(slot.visible());
        assert_eq!(slot.bitrate_mbps(), 0.0);
        assert_eq!(slot.latency_ms(), 0);
        assert_eq!(slot.audio().levels(), &[0.0; METER_CHANNELS]);
    }

    #[test]
    fn test_peak_level_and_classes() {
        let mut record = test_record("cam-1");
        *record.audio_mut().levels_mut() = [12.0, 65.0, 85.0, 97.0];
        assert_eq!(record.peak_level(), 97.0);
        assert_eq!(
            record.level_classes(),
            [
                LevelClass::Safe,
                LevelClass::Caution,
                LevelClass::Danger,
                LevelClass::Peak
            ]
        );
    }

    #[test]
    fn test_resolution_rejects_zero() {
        assert_eq!(
            Resolution::new(0, 1080),
            Err(ConfigError::InvalidResolution {
                width: 0,
                height: 1080
            })
        );
        assert!(Resolution::new(1280, 0).is_err());
        assert_eq!(Resolution::new(1920, 1080).unwrap(), Resolution::HD_1080);
        assert_eq!(Resolution::HD_720.width(), 1280);
        assert_eq!(Resolution::HD_720.height(), 720);
        assert_eq!(Resolution::UHD_4K.pixel_count(), 8_294_400);
    }

    #[test]
    fn test_set_source_keeps_name_when_unknown() {
        let mut record = test_record("cam-1");
        record.set_source("mystery".into(), None);
        assert_eq!(record.source_id(), "mystery");
        assert_eq!(record.display_name(), "Feed cam-1");
        assert_eq!(record.id(), "cam-1");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(test_record("cam-1")).unwrap();
        assert_eq!(json["displayName"], "Feed cam-1");
        assert_eq!(json["status"], "active");
        assert_eq!(json["audio"]["sampleRateHz"], 48_000);
        assert_eq!(json["audio"]["levels"].as_array().unwrap().len(), 4);
    }
}
