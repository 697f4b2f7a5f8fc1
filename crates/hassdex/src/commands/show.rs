//! `hassdex show`: read-only views over the current snapshot.

use tabled::Tabled;

use hassdex_core::{Area, Automation, Device, Entity, Snapshot, SnapshotStore};

use crate::cli::{GlobalOpts, ShowArgs, ShowCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{Ctx, report};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct EntityRow {
    #[tabled(rename = "Entity ID")]
    id: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Device")]
    device: String,
}

impl From<&Entity> for EntityRow {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.entity_id.clone(),
            state: e.state.clone(),
            name: e.friendly_name.clone(),
            area: e.area_name.clone().unwrap_or_default(),
            device: e.device_id.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Manufacturer")]
    manufacturer: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Area")]
    area: String,
    #[tabled(rename = "Entities")]
    entities: usize,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Device> for DeviceRow {
    fn from(d: &Device) -> Self {
        let status = match (&d.error, d.has_unavailable) {
            (Some(err), _) => err.clone(),
            (None, true) => "unavailable entities".into(),
            (None, false) => "ok".into(),
        };
        Self {
            id: d.id.clone(),
            name: d.display_name().to_owned(),
            manufacturer: d.manufacturer.clone(),
            model: d.model.clone(),
            area: if d.area_name.is_empty() {
                d.area_id.clone()
            } else {
                d.area_name.clone()
            },
            entities: d.entities.len(),
            status,
        }
    }
}

#[derive(Tabled)]
struct AreaRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Entities")]
    entities: usize,
    #[tabled(rename = "Devices")]
    devices: usize,
}

impl From<&Area> for AreaRow {
    fn from(a: &Area) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            entities: a.entities.len(),
            devices: a.devices.len(),
        }
    }
}

#[derive(Tabled)]
struct AutomationRow {
    #[tabled(rename = "Entity ID")]
    id: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Last Triggered")]
    last_triggered: String,
    #[tabled(rename = "Controls")]
    controls: usize,
}

impl From<&Automation> for AutomationRow {
    fn from(a: &Automation) -> Self {
        Self {
            id: a.entity_id.clone(),
            alias: a.alias.clone(),
            state: a.state.clone(),
            last_triggered: a.last_triggered.clone().unwrap_or_else(|| "-".into()),
            controls: a.referenced_entities.len(),
        }
    }
}

// ── Filters ─────────────────────────────────────────────────────────

fn filter_entities<'a>(
    snapshot: &'a Snapshot,
    domain: Option<&str>,
    unavailable_only: bool,
) -> Vec<&'a Entity> {
    snapshot
        .entities
        .iter()
        .filter(|e| domain.is_none_or(|d| e.domain == d))
        .filter(|e| !unavailable_only || e.is_unavailable())
        .collect()
}

/// Automations controlling `entity`, via the relationship map.
fn automations_for<'a>(snapshot: &'a Snapshot, entity: &str) -> Vec<&'a Automation> {
    let controllers = snapshot.relationships.controllers_of(entity);
    snapshot
        .automations
        .iter()
        .filter(|a| controllers.contains(&a.entity_id))
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ShowArgs, global: &GlobalOpts, ctx: &Ctx) -> Result<(), CliError> {
    let (current, previous) = config::snapshot_paths(global, &ctx.config);
    let snapshot = SnapshotStore::new(current, previous).load_current()?;
    let painter = ctx.painter;

    let out = match args.command {
        ShowCommand::Summary => output::render_single(
            ctx.format,
            &snapshot.summary,
            |_| report::summary(&snapshot, painter),
            |_| report::summary_plain(&snapshot),
        ),
        ShowCommand::Entities {
            domain,
            unavailable,
        } => {
            let entities = filter_entities(&snapshot, domain.as_deref(), unavailable);
            output::render_list(
                ctx.format,
                &entities,
                |e| EntityRow::from(*e),
                |e| e.entity_id.clone(),
            )
        }
        ShowCommand::Devices { issues } => {
            let devices: Vec<&Device> = snapshot
                .devices
                .iter()
                .filter(|d| !issues || d.has_unavailable)
                .collect();
            output::render_list(
                ctx.format,
                &devices,
                |d| DeviceRow::from(*d),
                |d| d.id.clone(),
            )
        }
        ShowCommand::Areas => output::render_list(
            ctx.format,
            &snapshot.areas,
            |a| AreaRow::from(a),
            |a| a.id.clone(),
        ),
        ShowCommand::Automations { entity } => {
            let automations: Vec<&Automation> = match entity.as_deref() {
                Some(entity) => automations_for(&snapshot, entity),
                None => snapshot.automations.iter().collect(),
            };
            output::render_list(
                ctx.format,
                &automations,
                |a| AutomationRow::from(*a),
                |a| a.entity_id.clone(),
            )
        }
        ShowCommand::Issues => output::render_single(
            ctx.format,
            &snapshot.issues,
            |i| report::issues(i, painter),
            |i| i.unavailable_entities.join("\n"),
        ),
        ShowCommand::Changes => output::render_single(
            ctx.format,
            &snapshot.changes_since_last,
            |c| report::changes(c, painter),
            report::changes_plain,
        ),
    };
    output::print_output(&out, ctx.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn snapshot() -> Snapshot {
        serde_json::from_value(json!({
            "indexed_at": "2026-10-18T09:00:00+02:00",
            "entities": [
                { "entity_id": "light.a", "state": "on", "domain": "light" },
                { "entity_id": "light.b", "state": "unavailable", "domain": "light" },
                { "entity_id": "switch.c", "state": "unavailable", "domain": "switch" }
            ],
            "automations": [
                { "entity_id": "automation.one", "referenced_entities": ["light.a"] },
                { "entity_id": "automation.two", "referenced_entities": ["switch.c"] }
            ],
            "relationships": {
                "automation_controls": {
                    "automation.one": ["light.a"],
                    "automation.two": ["switch.c"]
                },
                "entity_controlled_by": {
                    "light.a": ["automation.one"],
                    "switch.c": ["automation.two"]
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn entity_filters_combine() {
        let snap = snapshot();
        let ids = |v: Vec<&Entity>| v.iter().map(|e| e.entity_id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(filter_entities(&snap, None, false)).len(), 3);
        assert_eq!(ids(filter_entities(&snap, Some("light"), false)), vec!["light.a", "light.b"]);
        assert_eq!(ids(filter_entities(&snap, Some("light"), true)), vec!["light.b"]);
        assert_eq!(ids(filter_entities(&snap, None, true)), vec!["light.b", "switch.c"]);
    }

    #[test]
    fn automations_for_uses_relationship_map() {
        let snap = snapshot();
        let found = automations_for(&snap, "switch.c");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity_id, "automation.two");
        assert!(automations_for(&snap, "light.b").is_empty());
    }
}
