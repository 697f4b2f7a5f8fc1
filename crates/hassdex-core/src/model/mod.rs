// ── Domain model ──
//
// Serde types whose JSON field names are the on-disk snapshot schema.
// Fields are additive only: older snapshots must keep deserializing so
// they stay diffable.

pub mod area;
pub mod automation;
pub mod changes;
pub mod device;
pub mod entity;
pub mod relationships;
pub mod snapshot;

pub use area::Area;
pub use automation::{Automation, EntityRefs, REFERENCE_KEYS};
pub use changes::{
    AvailabilityChanges, ChangeDelta, ChangeSet, DeviceChanges, EntityChanges, FirstIndex,
    StateChange,
};
pub use device::Device;
pub use entity::{Entity, UNAVAILABLE, domain_of};
pub use relationships::Relationships;
pub use snapshot::{Issues, Snapshot, Summary};
