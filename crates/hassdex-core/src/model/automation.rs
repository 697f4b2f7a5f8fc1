use std::collections::BTreeSet;

use hassdex_api::StateObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute keys scanned for referenced entity ids.
pub const REFERENCE_KEYS: [&str; 3] = ["entity_id", "target", "service_data"];

/// Entity-id prefix of automation rules.
pub const AUTOMATION_PREFIX: &str = "automation.";

/// Entity references carried by one attribute value, decoded once.
///
/// Only strings containing a domain separator count as entity ids;
/// anything else (numbers, objects, plain words) decodes to `Absent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityRefs {
    Absent,
    Single(String),
    Many(Vec<String>),
}

impl EntityRefs {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) if looks_like_entity_id(s) => Self::Single(s.clone()),
            Some(Value::Array(items)) => Self::Many(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .filter(|s| looks_like_entity_id(s))
                    .map(str::to_owned)
                    .collect(),
            ),
            _ => Self::Absent,
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Absent => Vec::new(),
            Self::Single(id) => vec![id],
            Self::Many(ids) => ids,
        }
    }
}

fn looks_like_entity_id(s: &str) -> bool {
    s.contains('.')
}

/// A rule entity and the entities it (heuristically) controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Automation {
    pub entity_id: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub last_triggered: Option<String>,
    /// Sorted, duplicate-free. Best effort: the attribute schema is not
    /// guaranteed, so this may under-report.
    #[serde(default)]
    pub referenced_entities: Vec<String>,
}

impl Automation {
    /// Whether a state belongs to the automation domain.
    pub fn is_automation(state: &StateObject) -> bool {
        state.entity_id.starts_with(AUTOMATION_PREFIX)
    }

    pub fn from_state(state: &StateObject) -> Self {
        let referenced: BTreeSet<String> = REFERENCE_KEYS
            .iter()
            .flat_map(|key| EntityRefs::from_value(state.attribute(key)).into_vec())
            .collect();

        Self {
            entity_id: state.entity_id.clone(),
            alias: state
                .attribute_str("friendly_name")
                .unwrap_or_default()
                .to_owned(),
            state: state.state.clone(),
            last_triggered: state.attribute_str("last_triggered").map(str::to_owned),
            referenced_entities: referenced.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: serde_json::Value) -> StateObject {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn refs_decode_single_list_and_absent() {
        assert_eq!(
            EntityRefs::from_value(Some(&json!("light.kitchen"))),
            EntityRefs::Single("light.kitchen".into())
        );
        assert_eq!(
            EntityRefs::from_value(Some(&json!(["light.a", 3, "plain", "switch.b"]))),
            EntityRefs::Many(vec!["light.a".into(), "switch.b".into()])
        );
        assert_eq!(EntityRefs::from_value(Some(&json!("plain"))), EntityRefs::Absent);
        assert_eq!(
            EntityRefs::from_value(Some(&json!({"entity_id": "light.a"}))),
            EntityRefs::Absent
        );
        assert_eq!(EntityRefs::from_value(None), EntityRefs::Absent);
    }

    #[test]
    fn referenced_entities_are_deduplicated() {
        let auto = Automation::from_state(&state(json!({
            "entity_id": "automation.night",
            "state": "on",
            "attributes": {
                "friendly_name": "Night mode",
                "last_triggered": "2026-01-02T03:04:05+00:00",
                "entity_id": ["light.hall", "light.hall", "lock.front"],
                "target": "light.hall",
                "service_data": ["lock.front"]
            }
        })));

        assert_eq!(auto.alias, "Night mode");
        assert_eq!(auto.last_triggered.as_deref(), Some("2026-01-02T03:04:05+00:00"));
        assert_eq!(auto.referenced_entities, vec!["light.hall", "lock.front"]);
    }

    #[test]
    fn missing_attributes_use_defaults() {
        let auto = Automation::from_state(&state(json!({
            "entity_id": "automation.bare",
            "state": "off"
        })));
        assert_eq!(auto.alias, "");
        assert_eq!(auto.last_triggered, None);
        assert!(auto.referenced_entities.is_empty());
    }

    #[test]
    fn only_automation_prefix_matches() {
        assert!(Automation::is_automation(&state(
            json!({"entity_id": "automation.x", "state": "on"})
        )));
        assert!(!Automation::is_automation(&state(
            json!({"entity_id": "automations.x", "state": "on"})
        )));
    }
}
