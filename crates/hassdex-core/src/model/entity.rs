use serde::{Deserialize, Serialize};

/// State string the hub reports for entities it cannot reach.
pub const UNAVAILABLE: &str = "unavailable";

/// The part of an entity id before the first `.` (`light.kitchen` -> `light`).
///
/// An id without a separator is its own domain.
pub fn domain_of(entity_id: &str) -> &str {
    entity_id
        .split_once('.')
        .map_or(entity_id, |(domain, _)| domain)
}

/// An addressable point (sensor, switch, ...) as seen in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
}

impl Entity {
    pub fn is_unavailable(&self) -> bool {
        self.state == UNAVAILABLE
    }
}
