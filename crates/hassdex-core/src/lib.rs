//! Snapshot-and-diff indexing for a Home Assistant hub.
//!
//! The pipeline runs strictly forward:
//!
//! 1. a [`HubSource`] (normally [`hassdex_api::HubClient`]) supplies states,
//!    config and registry listings;
//! 2. [`IndexBuilder`] assembles a normalized [`Snapshot`];
//! 3. [`compute_changes`] diffs it against the prior snapshot;
//! 4. [`SnapshotStore`] rotates the old file into the backup slot and
//!    writes the new one.
//!
//! [`Indexer`] wires the four steps together from an [`IndexerConfig`].

pub mod builder;
pub mod config;
pub mod diff;
pub mod error;
pub mod indexer;
pub mod model;
pub mod source;
pub mod store;

pub use builder::{BuildProgress, DEVICE_PROGRESS_INTERVAL, IndexBuilder, IndexStage, NoProgress};
pub use config::{IndexerConfig, TlsVerification};
pub use diff::compute_changes;
pub use error::CoreError;
pub use indexer::{IndexOutcome, Indexer, RunOptions};
pub use model::{
    Area, Automation, ChangeDelta, ChangeSet, Device, Entity, Issues, Relationships, Snapshot,
    StateChange, Summary,
};
pub use source::HubSource;
pub use store::SnapshotStore;
