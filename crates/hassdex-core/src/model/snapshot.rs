use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Area, Automation, ChangeSet, Device, Entity, Relationships};

/// Hub version recorded when the hub does not report one.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Location name recorded when the hub does not report one.
pub const DEFAULT_LOCATION: &str = "Home";

/// Totals per category plus the domain histogram.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_entities: usize,
    #[serde(default)]
    pub total_devices: usize,
    #[serde(default)]
    pub total_areas: usize,
    #[serde(default)]
    pub total_automations: usize,
    #[serde(default)]
    pub unavailable_count: usize,
    #[serde(default)]
    pub domains: BTreeMap<String, usize>,
}

/// Things that need a human's attention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issues {
    #[serde(default)]
    pub unavailable_entities: Vec<String>,
    /// Names of devices owning at least one unavailable entity.
    #[serde(default)]
    pub devices_with_issues: Vec<String>,
}

/// Full point-in-time index of the hub.
///
/// Every collection defaults to empty on load so sparse or older snapshot
/// files still work as a diff baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub indexed_at: String,
    #[serde(default = "unknown_version")]
    pub ha_version: String,
    #[serde(default = "default_location")]
    pub location_name: String,
    #[serde(default)]
    pub summary: Summary,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub devices: Vec<Device>,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub automations: Vec<Automation>,
    #[serde(default)]
    pub relationships: Relationships,
    #[serde(default)]
    pub issues: Issues,
    #[serde(default)]
    pub changes_since_last: ChangeSet,
}

fn unknown_version() -> String {
    UNKNOWN_VERSION.into()
}

fn default_location() -> String {
    DEFAULT_LOCATION.into()
}

impl Summary {
    /// Count everything from the collections themselves so the totals can
    /// never drift from what is stored.
    pub fn tally(
        entities: &[Entity],
        devices: &[Device],
        areas: usize,
        automations: &[Automation],
        unavailable: usize,
    ) -> Self {
        let mut domains = BTreeMap::new();
        for entity in entities {
            *domains.entry(entity.domain.clone()).or_insert(0) += 1;
        }
        Self {
            total_entities: entities.len(),
            total_devices: devices.len(),
            total_areas: areas,
            total_automations: automations.len(),
            unavailable_count: unavailable,
            domains,
        }
    }
}

impl Snapshot {
    /// Whether the summary counters agree with the stored collections.
    pub fn summary_is_consistent(&self) -> bool {
        let s = &self.summary;
        s.total_entities == self.entities.len()
            && s.total_devices == self.devices.len()
            && s.total_areas == self.areas.len()
            && s.total_automations == self.automations.len()
            && s.unavailable_count == self.issues.unavailable_entities.len()
            && s.domains.values().sum::<usize>() == self.entities.len()
    }

    pub fn entity(&self, entity_id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.entity_id == entity_id)
    }

    pub fn device(&self, device_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == device_id)
    }
}
