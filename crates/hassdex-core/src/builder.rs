// ── Index builder ──
//
// Assembles a `Snapshot` from a `HubSource`. Every hub call is awaited in
// turn: states, config, areas, area members, then per-device lookups.
// Any fetch error aborts the build; only device-info lookups degrade to a
// placeholder record.

use std::collections::{HashMap, HashSet};

use chrono::{Local, SecondsFormat};
use hassdex_api::{HubConfig, StateObject};
use indexmap::IndexMap;
use strum::Display;
use tracing::{debug, info};

use crate::error::CoreError;
use crate::model::snapshot::{DEFAULT_LOCATION, UNKNOWN_VERSION};
use crate::model::{
    Area, Automation, ChangeSet, Device, Entity, Issues, Relationships, Snapshot, Summary,
    UNAVAILABLE, domain_of,
};
use crate::source::HubSource;

/// A progress line is logged once per this many devices.
pub const DEVICE_PROGRESS_INTERVAL: usize = 20;

/// Pipeline stage reported to a [`BuildProgress`] observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum IndexStage {
    #[strum(to_string = "Fetching states")]
    States,
    #[strum(to_string = "Fetching config")]
    Config,
    #[strum(to_string = "Fetching areas")]
    Areas,
    #[strum(to_string = "Fetching devices")]
    Devices,
    #[strum(to_string = "Building entity index")]
    Entities,
    #[strum(to_string = "Mapping automation relationships")]
    Automations,
    #[strum(to_string = "Building relationship map")]
    Relationships,
}

/// Observer for a running build. Both hooks default to no-ops.
pub trait BuildProgress {
    fn stage(&mut self, _stage: IndexStage) {}

    /// Called before device `index` (zero-based) of `total` is fetched.
    fn device(&mut self, _index: usize, _total: usize) {}
}

/// Progress observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl BuildProgress for NoProgress {}

/// Builds one snapshot from a hub.
pub struct IndexBuilder<'a, S> {
    source: &'a S,
}

/// Areas keyed by id in registry order, plus the entity -> area lookup
/// built once while ingesting them (first area listing an entity wins).
struct AreaIndex {
    areas: IndexMap<String, Area>,
    entity_area: HashMap<String, String>,
}

/// Device records plus the entity -> owning device lookup.
struct DeviceIndex {
    devices: Vec<Device>,
    entity_device: HashMap<String, String>,
}

impl<'a, S: HubSource> IndexBuilder<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self { source }
    }

    /// Fetch everything and assemble the snapshot.
    ///
    /// `changes_since_last` is left as the first-index marker; the caller
    /// attaches the real delta once the prior snapshot is loaded.
    pub async fn build<P: BuildProgress>(&self, progress: &mut P) -> Result<Snapshot, CoreError> {
        progress.stage(IndexStage::States);
        info!("{}", IndexStage::States);
        let states = self.source.states().await?;
        debug!(count = states.len(), "states fetched");

        progress.stage(IndexStage::Config);
        info!("{}", IndexStage::Config);
        let config = self.source.config().await?;

        progress.stage(IndexStage::Areas);
        info!("{}", IndexStage::Areas);
        let mut area_index = self.fetch_areas().await?;

        let unavailable: Vec<String> = states
            .iter()
            .filter(|s| s.state == UNAVAILABLE)
            .map(|s| s.entity_id.clone())
            .collect();
        let unavailable_set: HashSet<&str> = unavailable.iter().map(String::as_str).collect();

        progress.stage(IndexStage::Devices);
        info!("{}", IndexStage::Devices);
        let device_index = self
            .fetch_devices(&unavailable_set, &mut area_index.areas, progress)
            .await?;

        progress.stage(IndexStage::Entities);
        info!("{}", IndexStage::Entities);
        let entities = build_entities(&states, &area_index, &device_index.entity_device);

        progress.stage(IndexStage::Automations);
        info!("{}", IndexStage::Automations);
        let automations: Vec<Automation> = states
            .iter()
            .filter(|s| Automation::is_automation(s))
            .map(Automation::from_state)
            .collect();

        progress.stage(IndexStage::Relationships);
        info!("{}", IndexStage::Relationships);
        let devices = device_index.devices;
        let areas: Vec<Area> = area_index.areas.into_values().collect();
        let relationships = Relationships::build(&automations, &devices, &areas);

        let summary = Summary::tally(
            &entities,
            &devices,
            areas.len(),
            &automations,
            unavailable.len(),
        );
        let issues = Issues {
            devices_with_issues: devices
                .iter()
                .filter(|d| d.has_unavailable)
                .map(|d| d.name.clone())
                .collect(),
            unavailable_entities: unavailable,
        };
        let (ha_version, location_name) = hub_metadata(config);

        Ok(Snapshot {
            indexed_at: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            ha_version,
            location_name,
            summary,
            areas,
            devices,
            entities,
            automations,
            relationships,
            issues,
            changes_since_last: ChangeSet::first_index(),
        })
    }

    async fn fetch_areas(&self) -> Result<AreaIndex, CoreError> {
        let mut areas: IndexMap<String, Area> = IndexMap::new();
        for area in self.source.areas().await? {
            // A repeated id keeps its first position but takes the later name.
            areas
                .entry(area.id.clone())
                .and_modify(|a| a.name.clone_from(&area.name))
                .or_insert_with(|| Area::new(area.id, area.name));
        }

        let mut entity_area = HashMap::new();
        for (id, area) in &mut areas {
            area.entities = self.source.area_entities(id).await?;
            for entity_id in &area.entities {
                entity_area
                    .entry(entity_id.clone())
                    .or_insert_with(|| id.clone());
            }
        }
        debug!(count = areas.len(), "areas fetched");

        Ok(AreaIndex { areas, entity_area })
    }

    async fn fetch_devices<P: BuildProgress>(
        &self,
        unavailable: &HashSet<&str>,
        areas: &mut IndexMap<String, Area>,
        progress: &mut P,
    ) -> Result<DeviceIndex, CoreError> {
        let ids = self.source.device_ids().await?;
        let total = ids.len();
        let mut devices = Vec::with_capacity(total);
        let mut entity_device = HashMap::new();

        for (i, device_id) in ids.iter().enumerate() {
            if i % DEVICE_PROGRESS_INTERVAL == 0 {
                info!("Processing device {}/{total}", i + 1);
            }
            progress.device(i, total);

            let lookup = self.source.device_info(device_id).await;
            let mut device = Device::from_lookup(device_id, lookup);
            device.entities = self.source.device_entities(device_id).await?;

            // Later devices claim shared entities.
            for entity_id in &device.entities {
                entity_device.insert(entity_id.clone(), device_id.clone());
            }
            device.has_unavailable = device
                .entities
                .iter()
                .any(|e| unavailable.contains(e.as_str()));

            if let Some(area) = device.area().and_then(|id| areas.get_mut(id)) {
                area.devices.push(device_id.clone());
            }
            devices.push(device);
        }

        Ok(DeviceIndex {
            devices,
            entity_device,
        })
    }
}

fn build_entities(
    states: &[StateObject],
    area_index: &AreaIndex,
    entity_device: &HashMap<String, String>,
) -> Vec<Entity> {
    states
        .iter()
        .map(|state| {
            let area = area_index
                .entity_area
                .get(&state.entity_id)
                .and_then(|id| area_index.areas.get(id));
            Entity {
                entity_id: state.entity_id.clone(),
                state: state.state.clone(),
                friendly_name: state
                    .attribute_str("friendly_name")
                    .unwrap_or(state.entity_id.as_str())
                    .to_owned(),
                domain: domain_of(&state.entity_id).to_owned(),
                device_id: entity_device.get(&state.entity_id).cloned(),
                area_id: area.map(|a| a.id.clone()),
                area_name: area.map(|a| a.name.clone()),
            }
        })
        .collect()
}

fn hub_metadata(config: HubConfig) -> (String, String) {
    (
        config.version.unwrap_or_else(|| UNKNOWN_VERSION.into()),
        config
            .location_name
            .unwrap_or_else(|| DEFAULT_LOCATION.into()),
    )
}
