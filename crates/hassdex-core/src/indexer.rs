// ── Indexer facade ──
//
// One indexing run: connect, build, diff against the prior snapshot,
// rotate and write. Nothing touches disk until the snapshot and its
// delta are complete, so a failed run leaves both files as they were.

use std::time::Instant;

use hassdex_api::{HubClient, TlsMode, TransportConfig};
use tracing::{debug, info};

use crate::builder::{BuildProgress, IndexBuilder};
use crate::config::{IndexerConfig, TlsVerification};
use crate::diff::compute_changes;
use crate::error::CoreError;
use crate::model::Snapshot;
use crate::source::HubSource;
use crate::store::SnapshotStore;

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Build and diff, but leave both snapshot files untouched.
    pub dry_run: bool,
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct IndexOutcome {
    pub snapshot: Snapshot,
    /// Whether the snapshot was written to disk.
    pub written: bool,
}

/// Drives the Fetcher -> Builder -> Differ -> Persistence pipeline.
pub struct Indexer {
    config: IndexerConfig,
    store: SnapshotStore,
}

impl Indexer {
    pub fn new(config: IndexerConfig) -> Self {
        let store = SnapshotStore::new(&config.index_path, &config.previous_index_path);
        Self { config, store }
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    /// Build an authenticated hub client from the config.
    pub fn connect(&self) -> Result<HubClient, CoreError> {
        let transport = build_transport(&self.config);
        let client = HubClient::from_token(
            self.config.hub_url.as_str(),
            &self.config.token,
            &transport,
        )?;
        debug!(hub = %client.base_url(), timeout = ?transport.timeout, "hub client ready");
        Ok(client)
    }

    /// Run the full pipeline against the configured hub.
    pub async fn run<P: BuildProgress>(
        &self,
        options: RunOptions,
        progress: &mut P,
    ) -> Result<IndexOutcome, CoreError> {
        let client = self.connect()?;
        info!(hub = %self.config.hub_url, "indexing hub");
        self.run_with(&client, options, progress).await
    }

    /// Run the pipeline against any [`HubSource`].
    pub async fn run_with<S: HubSource, P: BuildProgress>(
        &self,
        source: &S,
        options: RunOptions,
        progress: &mut P,
    ) -> Result<IndexOutcome, CoreError> {
        let started = Instant::now();
        let mut snapshot = IndexBuilder::new(source).build(progress).await?;

        let prior = self.store.load_prior()?;
        snapshot.changes_since_last = compute_changes(&snapshot, prior.as_ref());
        debug!(
            first_index = snapshot.changes_since_last.is_first_index(),
            "changes computed"
        );

        let written = if options.dry_run {
            info!("dry run, snapshot not written");
            false
        } else {
            self.store.rotate_and_write(&snapshot)?;
            true
        };

        info!(
            entities = snapshot.summary.total_entities,
            devices = snapshot.summary.total_devices,
            areas = snapshot.summary.total_areas,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "index complete"
        );
        Ok(IndexOutcome { snapshot, written })
    }
}

fn build_transport(config: &IndexerConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
