use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Area, Automation, Device};

/// Derived cross-reference maps. Rebuilt every run, never persisted on
/// their own.
///
/// `entity_controlled_by` is exactly the transpose of
/// `automation_controls`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationships {
    #[serde(default)]
    pub automation_controls: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub entity_controlled_by: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub device_entity_map: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub area_device_map: IndexMap<String, Vec<String>>,
}

impl Relationships {
    pub fn build<'a>(
        automations: &[Automation],
        devices: &[Device],
        areas: impl IntoIterator<Item = &'a Area>,
    ) -> Self {
        let automation_controls: IndexMap<String, Vec<String>> = automations
            .iter()
            .map(|a| (a.entity_id.clone(), a.referenced_entities.clone()))
            .collect();
        let entity_controlled_by = invert(&automation_controls);

        Self {
            automation_controls,
            entity_controlled_by,
            device_entity_map: devices
                .iter()
                .map(|d| (d.id.clone(), d.entities.clone()))
                .collect(),
            area_device_map: areas
                .into_iter()
                .map(|a| (a.id.clone(), a.devices.clone()))
                .collect(),
        }
    }

    /// Automations that reference `entity_id`.
    pub fn controllers_of(&self, entity_id: &str) -> &[String] {
        self.entity_controlled_by
            .get(entity_id)
            .map_or(&[], Vec::as_slice)
    }
}

/// Transpose a one-to-many map. Value lists keep the key order of `forward`.
fn invert(forward: &IndexMap<String, Vec<String>>) -> IndexMap<String, Vec<String>> {
    let mut inverse: IndexMap<String, Vec<String>> = IndexMap::new();
    for (key, values) in forward {
        for value in values {
            inverse.entry(value.clone()).or_default().push(key.clone());
        }
    }
    inverse
}

#[cfg(test)]
mod tests {
    use super::*;

    fn automation(id: &str, refs: &[&str]) -> Automation {
        Automation {
            entity_id: id.into(),
            alias: String::new(),
            state: "on".into(),
            last_triggered: None,
            referenced_entities: refs.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn inverse_is_transpose_of_forward() {
        let autos = vec![
            automation("automation.a", &["light.x", "light.y"]),
            automation("automation.b", &["light.y"]),
            automation("automation.c", &[]),
        ];
        let rel = Relationships::build(&autos, &[], std::iter::empty());

        for (auto, entities) in &rel.automation_controls {
            for e in entities {
                assert!(rel.controllers_of(e).contains(auto));
            }
        }
        for (entity, autos) in &rel.entity_controlled_by {
            for a in autos {
                assert!(rel.automation_controls[a].contains(entity));
            }
        }
        assert_eq!(rel.controllers_of("light.y"), ["automation.a", "automation.b"]);
        assert!(rel.controllers_of("light.z").is_empty());
        assert!(rel.automation_controls.contains_key("automation.c"));
    }
}
