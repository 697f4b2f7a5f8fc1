// ── Differ ──
//
// Structured delta between two snapshots. Output order is deterministic:
// `added` and `state_changed` follow the current entity list, `removed`
// follows the previous one, and availability lists follow the respective
// `unavailable_entities` order.

use std::collections::{HashMap, HashSet};

use crate::model::{
    AvailabilityChanges, ChangeDelta, ChangeSet, Device, DeviceChanges, EntityChanges, Snapshot,
    StateChange,
};

/// Compare `current` against `previous`.
///
/// With no previous snapshot the result is the first-index marker and
/// nothing else is computed.
pub fn compute_changes(current: &Snapshot, previous: Option<&Snapshot>) -> ChangeSet {
    let Some(previous) = previous else {
        return ChangeSet::first_index();
    };

    ChangeSet::Delta(Box::new(ChangeDelta {
        previous_indexed_at: Some(previous.indexed_at.clone()).filter(|s| !s.is_empty()),
        entities: entity_changes(current, previous),
        devices: device_changes(&current.devices, &previous.devices),
        unavailable: availability_changes(
            &current.issues.unavailable_entities,
            &previous.issues.unavailable_entities,
        ),
    }))
}

fn entity_changes(current: &Snapshot, previous: &Snapshot) -> EntityChanges {
    let prev_states: HashMap<&str, &str> = previous
        .entities
        .iter()
        .map(|e| (e.entity_id.as_str(), e.state.as_str()))
        .collect();
    let curr_ids: HashSet<&str> = current
        .entities
        .iter()
        .map(|e| e.entity_id.as_str())
        .collect();

    let mut changes = EntityChanges::default();
    for entity in &current.entities {
        match prev_states.get(entity.entity_id.as_str()) {
            None => changes.added.push(entity.entity_id.clone()),
            Some(&old) if old != entity.state => changes.state_changed.push(StateChange {
                entity_id: entity.entity_id.clone(),
                old_state: old.to_owned(),
                new_state: entity.state.clone(),
            }),
            Some(_) => {}
        }
    }
    changes.removed = previous
        .entities
        .iter()
        .filter(|e| !curr_ids.contains(e.entity_id.as_str()))
        .map(|e| e.entity_id.clone())
        .collect();
    changes
}

fn device_changes(current: &[Device], previous: &[Device]) -> DeviceChanges {
    DeviceChanges {
        added: missing_from(current, previous),
        removed: missing_from(previous, current),
    }
}

/// Display names of devices in `from` whose id is absent in `other`.
fn missing_from(from: &[Device], other: &[Device]) -> Vec<String> {
    let ids: HashSet<&str> = other.iter().map(|d| d.id.as_str()).collect();
    from.iter()
        .filter(|d| !ids.contains(d.id.as_str()))
        .map(|d| d.display_name().to_owned())
        .collect()
}

fn availability_changes(current: &[String], previous: &[String]) -> AvailabilityChanges {
    AvailabilityChanges {
        now_unavailable: difference(current, previous),
        now_available: difference(previous, current),
    }
}

/// Items of `left` not in `right`, first occurrence only.
fn difference(left: &[String], right: &[String]) -> Vec<String> {
    let right: HashSet<&str> = right.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    left.iter()
        .filter(|id| !right.contains(id.as_str()) && seen.insert(id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Entity, Issues, domain_of};

    fn entity(id: &str, state: &str) -> Entity {
        Entity {
            entity_id: id.into(),
            state: state.into(),
            friendly_name: id.into(),
            domain: domain_of(id).into(),
            device_id: None,
            area_id: None,
            area_name: None,
        }
    }

    fn device(id: &str, name: &str) -> Device {
        let mut device = Device::placeholder(id);
        device.name = name.into();
        device.error = None;
        device
    }

    fn snapshot(at: &str, entities: &[(&str, &str)], unavailable: &[&str]) -> Snapshot {
        Snapshot {
            indexed_at: at.into(),
            entities: entities.iter().map(|(id, s)| entity(id, s)).collect(),
            issues: Issues {
                unavailable_entities: unavailable.iter().map(|s| (*s).to_owned()).collect(),
                devices_with_issues: Vec::new(),
            },
            ..Snapshot::default()
        }
    }

    fn delta(current: &Snapshot, previous: &Snapshot) -> ChangeDelta {
        compute_changes(current, Some(previous)).delta().unwrap().clone()
    }

    #[test]
    fn first_run_is_marker_only() {
        let current = snapshot("t1", &[("light.a", "on")], &[]);
        assert_eq!(compute_changes(&current, None), ChangeSet::first_index());
    }

    #[test]
    fn identical_snapshots_have_empty_delta() {
        let mut snap = snapshot(
            "t1",
            &[("light.a", "on"), ("light.b", "unavailable")],
            &["light.b"],
        );
        snap.devices = vec![device("d1", "Lamp")];

        let d = delta(&snap, &snap);
        assert!(d.is_empty());
        assert_eq!(d.previous_indexed_at.as_deref(), Some("t1"));
    }

    #[test]
    fn state_transition_is_recorded_once() {
        let previous = snapshot("t0", &[("light.kitchen", "off")], &[]);
        let current = snapshot("t1", &[("light.kitchen", "on")], &[]);

        let d = delta(&current, &previous);
        assert_eq!(
            d.entities.state_changed,
            vec![StateChange {
                entity_id: "light.kitchen".into(),
                old_state: "off".into(),
                new_state: "on".into(),
            }]
        );
        assert!(d.entities.added.is_empty());
        assert!(d.entities.removed.is_empty());
    }

    #[test]
    fn new_entity_is_added_not_changed() {
        let previous = snapshot("t0", &[("light.a", "on")], &[]);
        let current = snapshot("t1", &[("light.a", "on"), ("sensor.new_temp", "20")], &[]);

        let d = delta(&current, &previous);
        assert_eq!(d.entities.added, vec!["sensor.new_temp"]);
        assert!(d.entities.state_changed.is_empty());
    }

    #[test]
    fn added_and_removed_are_exclusive() {
        let previous = snapshot("t0", &[("a.one", "1"), ("a.two", "2"), ("a.three", "3")], &[]);
        let current = snapshot("t1", &[("a.three", "x"), ("a.four", "4"), ("a.one", "1")], &[]);

        let d = delta(&current, &previous);
        assert_eq!(d.entities.added, vec!["a.four"]);
        assert_eq!(d.entities.removed, vec!["a.two"]);
        assert_eq!(d.entities.state_changed.len(), 1);
        assert_eq!(d.entities.state_changed[0].entity_id, "a.three");
    }

    #[test]
    fn availability_transitions_both_ways() {
        let previous = snapshot("t0", &[], &["a", "b"]);
        let current = snapshot("t1", &[], &["b", "c"]);

        let d = delta(&current, &previous);
        assert_eq!(d.unavailable.now_available, vec!["a"]);
        assert_eq!(d.unavailable.now_unavailable, vec!["c"]);
    }

    #[test]
    fn devices_reported_by_display_name() {
        let mut previous = snapshot("t0", &[], &[]);
        previous.devices = vec![device("d1", "Old plug"), device("d2", "Hub")];
        let mut current = snapshot("t1", &[], &[]);
        current.devices = vec![device("d2", "Hub"), device("d3", "")];

        let d = delta(&current, &previous);
        assert_eq!(d.devices.added, vec!["d3"]);
        assert_eq!(d.devices.removed, vec!["Old plug"]);
    }

    #[test]
    fn missing_previous_timestamp_is_null() {
        let previous = Snapshot::default();
        let current = snapshot("t1", &[], &[]);
        assert_eq!(delta(&current, &previous).previous_indexed_at, None);
    }
}
