// ── Runtime indexer configuration ──
//
// These types describe *where* to index from and *where* snapshots go.
// They carry credential data but never touch disk themselves.
// The CLI constructs an `IndexerConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed certs on the LAN).
    DangerAcceptInvalid,
}

/// Everything one indexing run needs.
///
/// Built by the CLI, passed to `Indexer` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Hub base URL (e.g., `http://homeassistant.local:8123`).
    pub hub_url: Url,
    /// Long-lived access token.
    pub token: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where the current snapshot lives.
    pub index_path: PathBuf,
    /// Backup slot the current snapshot is rotated into.
    pub previous_index_path: PathBuf,
}

impl IndexerConfig {
    /// Derive the conventional backup path for a snapshot file:
    /// `home-index.json` -> `home-index.previous.json`.
    pub fn previous_path_for(index_path: &std::path::Path) -> PathBuf {
        let stem = index_path
            .file_stem()
            .map_or_else(|| "index".into(), |s| s.to_string_lossy().into_owned());
        let file = match index_path.extension() {
            Some(ext) => format!("{stem}.previous.{}", ext.to_string_lossy()),
            None => format!("{stem}.previous"),
        };
        index_path.with_file_name(file)
    }
}
