//! CLI configuration -- thin wrapper around `hassdex_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--hub, --token, --index, ...).

use std::path::PathBuf;

use clap::ValueEnum;
use secrecy::SecretString;

use hassdex_core::IndexerConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use hassdex_config::{
    Config, Defaults, Profile, config_path, keyring_entry, load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Output format: flag > config default > table.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// Color mode: flag > config default > auto.
pub fn color_mode(global: &GlobalOpts, config: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}

/// The active profile with CLI flag overrides applied on top.
///
/// Timeout falls back to the config-wide default so the shared
/// translation sees a concrete value.
fn effective_profile(global: &GlobalOpts, config: &Config, base: Profile) -> Profile {
    let mut profile = base;
    if let Some(ref hub) = global.hub {
        profile.hub_url.clone_from(hub);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    profile.timeout = global
        .timeout
        .or(profile.timeout)
        .or(Some(config.defaults.timeout));
    if let Some(ref index) = global.index {
        profile.index_path = Some(index.clone());
        // An explicit index without an explicit backup keeps the pair together
        profile.previous_index_path = None;
    }
    if let Some(ref previous) = global.previous_index {
        profile.previous_index_path = Some(previous.clone());
    }
    profile
}

/// Snapshot file pair: flags > profile > platform data dir.
///
/// Needs no hub or token, so offline commands work without a profile.
pub fn snapshot_paths(global: &GlobalOpts, config: &Config) -> (PathBuf, PathBuf) {
    let name = active_profile_name(global, config);
    let base = config.profiles.get(&name).cloned().unwrap_or_default();
    hassdex_config::snapshot_paths(&effective_profile(global, config, base))
}

/// Translate config + global flags into an `IndexerConfig`.
///
/// CLI flag overrides take priority over profile values. Without a
/// matching profile, `--hub` alone is enough (token from flags/env).
pub fn resolve_indexer_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<IndexerConfig, CliError> {
    let profile_name = active_profile_name(global, config);
    let base = match config.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.hub.is_some() => Profile::default(),
        None if global.profile.is_some() => {
            let mut names: Vec<_> = config.profiles.keys().cloned().collect();
            names.sort();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if names.is_empty() {
                    "(none)".into()
                } else {
                    names.join(", ")
                },
            });
        }
        None => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    let profile = effective_profile(global, config, base);
    let token = resolve_token_with_flags(&profile, &profile_name, global)?;
    Ok(hassdex_config::profile_to_indexer_config(&profile, token)?)
}

fn resolve_token_with_flags(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<SecretString, CliError> {
    if let Some(ref token) = global.token {
        return Ok(SecretString::from(token.clone()));
    }
    if let Some(ref path) = global.token_file {
        return Ok(hassdex_config::read_token_file(path)?);
    }
    Ok(hassdex_config::resolve_token(profile, profile_name)?)
}
