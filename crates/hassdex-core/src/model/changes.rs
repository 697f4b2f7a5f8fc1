use serde::{Deserialize, Serialize};

/// Entity whose state string differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    pub entity_id: String,
    pub old_state: String,
    pub new_state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityChanges {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(default)]
    pub state_changed: Vec<StateChange>,
}

/// Device additions/removals, recorded by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceChanges {
    #[serde(default)]
    pub added: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityChanges {
    #[serde(default)]
    pub now_unavailable: Vec<String>,
    #[serde(default)]
    pub now_available: Vec<String>,
}

/// Structured delta against a previous snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeDelta {
    #[serde(default)]
    pub previous_indexed_at: Option<String>,
    #[serde(default)]
    pub entities: EntityChanges,
    #[serde(default)]
    pub devices: DeviceChanges,
    #[serde(default)]
    pub unavailable: AvailabilityChanges,
}

impl ChangeDelta {
    /// `true` when nothing moved between the two snapshots.
    pub fn is_empty(&self) -> bool {
        self.entities.added.is_empty()
            && self.entities.removed.is_empty()
            && self.entities.state_changed.is_empty()
            && self.devices.added.is_empty()
            && self.devices.removed.is_empty()
            && self.unavailable.now_unavailable.is_empty()
            && self.unavailable.now_available.is_empty()
    }
}

/// Serialized as `{"first_index": true}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstIndex {
    pub first_index: bool,
}

/// What changed since the last snapshot.
///
/// A first run has nothing to compare against and carries only the
/// `first_index` marker; no other field exists in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChangeSet {
    FirstIndex(FirstIndex),
    Delta(Box<ChangeDelta>),
}

impl Default for ChangeSet {
    fn default() -> Self {
        Self::first_index()
    }
}

impl ChangeSet {
    pub fn first_index() -> Self {
        Self::FirstIndex(FirstIndex { first_index: true })
    }

    pub fn is_first_index(&self) -> bool {
        matches!(self, Self::FirstIndex(_))
    }

    pub fn delta(&self) -> Option<&ChangeDelta> {
        match self {
            Self::Delta(delta) => Some(delta),
            Self::FirstIndex(_) => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_index_serializes_as_marker_only() {
        assert_eq!(
            serde_json::to_value(ChangeSet::first_index()).unwrap(),
            json!({ "first_index": true })
        );
    }

    #[test]
    fn delta_round_trips_through_untagged_repr() {
        let value = json!({
            "previous_indexed_at": "2026-01-01T00:00:00",
            "entities": {
                "added": ["sensor.new"],
                "removed": [],
                "state_changed": [
                    { "entity_id": "light.kitchen", "old_state": "off", "new_state": "on" }
                ]
            },
            "devices": { "added": [], "removed": ["Old plug"] },
            "unavailable": { "now_unavailable": [], "now_available": ["light.porch"] }
        });
        let changes: ChangeSet = serde_json::from_value(value.clone()).unwrap();
        let delta = changes.delta().unwrap();
        assert_eq!(delta.entities.added, vec!["sensor.new"]);
        assert_eq!(delta.devices.removed, vec!["Old plug"]);
        assert!(!delta.is_empty());
        assert_eq!(serde_json::to_value(&changes).unwrap(), value);
    }

    #[test]
    fn marker_deserializes_as_first_index() {
        let changes: ChangeSet = serde_json::from_value(json!({ "first_index": true })).unwrap();
        assert!(changes.is_first_index());
        assert!(changes.delta().is_none());
    }
}
