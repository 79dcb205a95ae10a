//! Simulated telemetry
//!
//! Seeds new records and advances them once per tick with a bounded random
//! walk. Every function takes the RNG explicitly so callers can seed it.

use std::ops::Range;

use chrono::{DateTime, Utc};
use rand::Rng;

use super::config::GeneratorConfig;
use crate::model::level::{clamp_level, LEVEL_MAX, PEAK_THRESHOLD};
use crate::model::record::RecordParts;
use crate::model::source::SourceDescriptor;
use crate::model::{AudioState, Resolution, StreamRecord, StreamStatus, METER_CHANNELS};

/// Resolutions a record can be seeded with
pub const SEED_RESOLUTIONS: [Resolution; 3] =
    [Resolution::HD_1080, Resolution::HD_720, Resolution::UHD_4K];

/// Broadcast frame rates a record can be seeded with
pub const FRAME_RATES: [f64; 6] = [25.0, 29.97, 30.0, 50.0, 59.94, 60.0];

/// Seeded audio channel counts (stereo or multichannel)
pub const CHANNEL_COUNTS: [u8; 2] = [2, 8];

/// Audio sample rate of every seeded record
pub const SAMPLE_RATE_HZ: u32 = 48_000;

/// Latency seed range in milliseconds
pub const SEED_LATENCY_MS: Range<u32> = 20..120;

/// Pixel-count tier used to range-seed bitrate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitrateTier {
    /// Below 1080p
    Sd,
    /// 1080p up to 4K
    Hd,
    /// 4K and above
    Uhd,
}

impl BitrateTier {
    /// Tier for a resolution
    pub fn for_resolution(resolution: Resolution) -> Self {
        let pixels = resolution.pixel_count();
        if pixels >= Resolution::UHD_4K.pixel_count() {
            BitrateTier::Uhd
        } else if pixels >= Resolution::HD_1080.pixel_count() {
            BitrateTier::Hd
        } else {
            BitrateTier::Sd
        }
    }

    /// Bitrate range in Mbps; ranges are disjoint
    pub fn range(&self) -> Range<f64> {
        match self {
            BitrateTier::Sd => 2.0..6.0,
            BitrateTier::Hd => 8.0..20.0,
            BitrateTier::Uhd => 25.0..50.0,
        }
    }

    /// Random bitrate within this tier
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.range())
    }
}

/// Create a fresh record for a catalog source
pub fn seed_record<R: Rng + ?Sized>(
    source: &SourceDescriptor,
    config: &GeneratorConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) -> StreamRecord {
    let resolution = SEED_RESOLUTIONS[rng.gen_range(0..SEED_RESOLUTIONS.len())];
    let status = if rng.gen_bool(config.active_probability) {
        StreamStatus::Active
    } else {
        StreamStatus::Inactive
    };

    let mut levels = [0.0; METER_CHANNELS];
    for level in levels.iter_mut() {
        *level = rng.gen_range(0.0..=LEVEL_MAX);
    }
    let channel_count = CHANNEL_COUNTS[rng.gen_range(0..CHANNEL_COUNTS.len())];

    StreamRecord::from_parts(RecordParts {
        id: source.id.clone(),
        display_name: source.label.clone(),
        endpoint: source.endpoint.clone(),
        status,
        resolution,
        bitrate_mbps: BitrateTier::for_resolution(resolution).sample(rng),
        latency_ms: rng.gen_range(SEED_LATENCY_MS),
        frame_rate: FRAME_RATES[rng.gen_range(0..FRAME_RATES.len())],
        audio: AudioState::new(channel_count, SAMPLE_RATE_HZ, &levels, false),
        last_update: now,
    })
}

/// Advance one record by one tick and stamp it
pub fn drift_record<R: Rng + ?Sized>(
    record: &mut StreamRecord,
    config: &GeneratorConfig,
    rng: &mut R,
    now: DateTime<Utc>,
) {
    for level in record.audio_mut().levels_mut().iter_mut() {
        *level = next_level(*level, config, rng);
    }

    if rng.gen_bool(config.metric_drift_probability) {
        let delta = rng.gen_range(-config.bitrate_step..=config.bitrate_step);
        let bitrate = record.bitrate_mbps() + delta;
        record.set_bitrate_mbps(bitrate);
    }

    if rng.gen_bool(config.metric_drift_probability) {
        let step = config.latency_step as i64;
        let latency = record.latency_ms() as i64 + rng.gen_range(-step..=step);
        let floor = config.min_latency_ms as i64;
        record.set_latency_ms(latency.max(floor).min(u32::MAX as i64) as u32);
    }

    record.touch(now);
}

/// Replace a record's resolution and re-seed its bitrate into the new tier
pub fn apply_resolution<R: Rng + ?Sized>(
    record: &mut StreamRecord,
    resolution: Resolution,
    rng: &mut R,
    now: DateTime<Utc>,
) {
    record.set_resolution(resolution);
    record.set_bitrate_mbps(BitrateTier::for_resolution(resolution).sample(rng));
    record.touch(now);
}

fn next_level<R: Rng + ?Sized>(level: f64, config: &GeneratorConfig, rng: &mut R) -> f64 {
    if rng.gen_bool(config.transient_probability) {
        // transient: clip or drop-out
        if rng.gen_bool(0.5) {
            rng.gen_range(PEAK_THRESHOLD..=LEVEL_MAX)
        } else {
            0.0
        }
    } else {
        clamp_level(level + rng.gen_range(-config.level_step..=config.level_step))
    }
}
