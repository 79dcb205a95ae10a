//! Source catalog
//!
//! Sources are the logical feeds a grid slot can be switched to. The catalog
//! seeds the registry and also serves as the name lookup for source swaps.

use serde::Serialize;

/// A named feed origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDescriptor {
    /// Stable identifier, also used as the record id when seeded
    pub id: String,
    /// Operator-facing label
    pub label: String,
    /// Opaque origin reference
    pub endpoint: String,
}

impl SourceDescriptor {
    pub fn new(id: impl Into<String>, label: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            endpoint: endpoint.into(),
        }
    }
}

/// Built-in catalog of studio and remote feeds
pub fn default_catalog() -> Vec<SourceDescriptor> {
    const FEEDS: [(&str, &str); 12] = [
        ("cam-1", "Studio A - Camera 1"),
        ("cam-2", "Studio A - Camera 2"),
        ("cam-3", "Studio A - Camera 3"),
        ("cam-4", "Studio B - Camera 1"),
        ("cam-5", "Studio B - Camera 2"),
        ("remote-1", "Remote - Stadium"),
        ("remote-2", "Remote - City Hall"),
        ("playout-1", "Playout 1"),
        ("playout-2", "Playout 2"),
        ("graphics", "Graphics Engine"),
        ("replay", "Replay Server"),
        ("program", "Program Return"),
    ];

    FEEDS
        .iter()
        .enumerate()
        .map(|(i, (id, label))| {
            SourceDescriptor::new(*id, *label, format!("st2110://239.10.0.{}:5004", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_default_catalog_ids_unique() {
        let catalog = default_catalog();
        let ids: HashSet<_> = catalog.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), catalog.len());
        assert_eq!(catalog.len(), 12);
    }

    #[test]
    fn test_endpoints() {
        let catalog = default_catalog();
        assert_eq!(catalog[0].endpoint, "st2110://239.10.0.1:5004");
        assert_eq!(catalog[11].label, "Program Return");
    }
}
