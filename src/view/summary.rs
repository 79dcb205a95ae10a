//! Aggregate counts for the grid header

use serde::Serialize;

use crate::model::StreamRecord;
use crate::registry::EngineState;

/// Registry-wide aggregates, recomputed on every read
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridSummary {
    /// Records with `active` status
    pub active_count: usize,
    /// All records
    pub total_count: usize,
    /// Records currently muted
    pub muted_count: usize,
    /// Records currently visible
    pub visible_count: usize,
    /// Engine-wide mute flag
    pub global_muted: bool,
    /// Whether every record is muted (what the global mute button shows)
    pub all_muted: bool,
    /// Stored master volume
    pub master_volume: f64,
}

impl GridSummary {
    /// Count over a record sequence
    pub fn from_records(records: &[StreamRecord], global_muted: bool, master_volume: f64) -> Self {
        let muted_count = records.iter().filter(|r| r.audio().muted()).count();

        Self {
            active_count: records.iter().filter(|r| r.is_active()).count(),
            total_count: records.len(),
            muted_count,
            visible_count: records.iter().filter(|r| r.visible()).count(),
            global_muted,
            all_muted: !records.is_empty() && muted_count == records.len(),
            master_volume,
        }
    }

    /// Count over the live registry
    pub fn from_state(state: &EngineState) -> Self {
        Self::from_records(state.records(), state.global_muted(), state.master_volume())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::test_record;
    use crate::registry::RegistryConfig;

    #[test]
    fn test_counts() {
        let mut records = vec![test_record("a"), test_record("b"), test_record("c")];
        records[1].audio_mut().set_muted(true);
        records[2].set_visible(false);

        let summary = GridSummary::from_records(&records, false, 60.0);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.active_count, 3);
        assert_eq!(summary.muted_count, 1);
        assert_eq!(summary.visible_count, 2);
        assert!(!summary.all_muted);
        assert_eq!(summary.master_volume, 60.0);
    }

    #[test]
    fn test_empty() {
        let summary = GridSummary::from_records(&[], true, 0.0);
        assert_eq!(summary.total_count, 0);
        assert!(!summary.all_muted);
        assert!(summary.global_muted);
    }

    #[test]
    fn test_tracks_global_mute() {
        let config = RegistryConfig::default().seed_count(4).rng_seed(9);
        let mut state = EngineState::new(&config).unwrap();

        state.toggle_global_mute();
        let summary = GridSummary::from_state(&state);
        assert!(summary.global_muted);
        assert!(summary.all_muted);
        assert_eq!(summary.muted_count, 4);

        state.toggle_mute("cam-1");
        let summary = GridSummary::from_state(&state);
        assert!(summary.global_muted);
        assert!(!summary.all_muted);
    }
}
