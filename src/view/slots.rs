//! Grid slot builder

use serde::Serialize;

use crate::model::{LayoutDescriptor, StreamRecord};

/// One grid position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "camelCase")]
pub enum Slot {
    /// Occupied by a registry record
    Stream(StreamRecord),
    /// No record for this position
    Placeholder(StreamRecord),
}

impl Slot {
    /// The record shown in this slot (real or placeholder)
    pub fn record(&self) -> &StreamRecord {
        match self {
            Slot::Stream(record) | Slot::Placeholder(record) => record,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Slot::Placeholder(_))
    }

    pub fn id(&self) -> &str {
        self.record().id()
    }
}

/// Lay out `streams` (in registry order) across `layout`
///
/// Always returns exactly `layout.total_tiles()` slots. Streams past the last
/// tile are not shown; tiles past the last stream get placeholders with ids
/// `empty-{index}`.
pub fn build_slots(streams: &[StreamRecord], layout: &LayoutDescriptor) -> Vec<Slot> {
    (0..layout.total_tiles())
        .map(|index| match streams.get(index) {
            Some(record) => Slot::Stream(record.clone()),
            None => Slot::Placeholder(StreamRecord::placeholder(index)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::test_record;
    use crate::model::StreamStatus;

    fn streams(count: usize) -> Vec<StreamRecord> {
        (0..count).map(|i| test_record(&format!("s{i}"))).collect()
    }

    #[test]
    fn test_fills_with_placeholders() {
        let records = streams(5);
        let slots = build_slots(&records, &LayoutDescriptor::grid_3x3());

        assert_eq!(slots.len(), 9);
        for (i, slot) in slots.iter().take(5).enumerate() {
            assert!(!slot.is_placeholder());
            assert_eq!(slot.record(), &records[i]);
        }
        for (i, slot) in slots.iter().enumerate().skip(5) {
            assert!(slot.is_placeholder());
            assert_eq!(slot.id(), format!("empty-{i}"));

            let record = slot.record();
            assert_eq!(record.status(), StreamStatus::Inactive);
            assert!(record.audio().muted());
            assert!(record.visible());
            assert_eq!(record.bitrate_mbps(), 0.0);
            assert_eq!(record.latency_ms(), 0);
            assert_eq!(record.peak_level(), 0.0);
        }
    }

    #[test]
    fn test_truncates_to_layout() {
        let records = streams(12);
        let slots = build_slots(&records, &LayoutDescriptor::grid_2x2());

        assert_eq!(slots.len(), 4);
        assert!(slots.iter().all(|s| !s.is_placeholder()));
        assert_eq!(slots[3].id(), "s3");
    }

    #[test]
    fn test_empty_registry() {
        let slots = build_slots(&[], &LayoutDescriptor::grid_4x4());
        assert_eq!(slots.len(), 16);
        assert_eq!(slots[0].id(), "empty-0");
        assert_eq!(slots[15].id(), "empty-15");
    }

    #[test]
    fn test_does_not_touch_input() {
        let records = streams(3);
        let before = records.clone();
        let _ = build_slots(&records, &LayoutDescriptor::grid_3x3());
        assert_eq!(records, before);
    }

    #[test]
    fn test_serialized_kind() {
        let slots = build_slots(&streams(1), &LayoutDescriptor::grid_2x2());
        let json = serde_json::to_value(&slots).unwrap();
        assert_eq!(json[0]["kind"], "stream");
        assert_eq!(json[1]["kind"], "placeholder");
        assert_eq!(json[1]["record"]["id"], "empty-1");
    }
}
