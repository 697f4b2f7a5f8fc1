//! Clap derive structures for the `hassdex` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// hassdex -- snapshot a Home Assistant hub and diff it against last time
#[derive(Debug, Parser)]
#[command(
    name = "hassdex",
    version,
    about = "Snapshot a Home Assistant hub and report what changed",
    long_about = "Indexes every entity, device, area and automation on a Home Assistant\n\
        hub into a JSON snapshot, then reports what changed since the previous\n\
        snapshot: new and removed entities, state transitions, devices that\n\
        appeared or vanished, and entities that went (un)available.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Hub profile to use
    #[arg(long, short = 'p', env = "HASSDEX_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Hub base URL (overrides profile)
    #[arg(long, short = 'H', env = "HASSDEX_HUB", global = true)]
    pub hub: Option<String>,

    /// Long-lived access token
    #[arg(long, env = "HASSDEX_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Read the access token from this file
    #[arg(long, env = "HASSDEX_TOKEN_FILE", global = true)]
    pub token_file: Option<PathBuf>,

    /// Current snapshot file (overrides profile)
    #[arg(long, env = "HASSDEX_INDEX", global = true)]
    pub index: Option<PathBuf>,

    /// Backup snapshot file (defaults to `<index>.previous.json`)
    #[arg(long, env = "HASSDEX_PREVIOUS_INDEX", global = true)]
    pub previous_index: Option<PathBuf>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "HASSDEX_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: from config, else auto]
    #[arg(long, env = "HASSDEX_COLOR", global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "HASSDEX_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: from profile, else 30]
    #[arg(long, env = "HASSDEX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table / human-readable report (default)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a fresh snapshot from the hub and diff it against the last one
    #[command(alias = "i")]
    Index(IndexArgs),

    /// Inspect the current snapshot without contacting the hub
    #[command(alias = "s")]
    Show(ShowArgs),

    /// Compare two snapshot files offline
    Diff(DiffArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INDEX
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct IndexArgs {
    /// Build and diff, but do not rotate or write snapshot files
    #[arg(long, short = 'n')]
    pub dry_run: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SHOW
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ShowArgs {
    #[command(subcommand)]
    pub command: ShowCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShowCommand {
    /// Totals and domain histogram
    Summary,

    /// List entities
    #[command(alias = "e")]
    Entities {
        /// Only entities in this domain (e.g., "light")
        #[arg(long, short = 'd')]
        domain: Option<String>,

        /// Only unavailable entities
        #[arg(long, short = 'u')]
        unavailable: bool,
    },

    /// List devices
    #[command(alias = "d")]
    Devices {
        /// Only devices owning an unavailable entity
        #[arg(long)]
        issues: bool,
    },

    /// List areas
    #[command(alias = "a")]
    Areas,

    /// List automations
    Automations {
        /// Only automations referencing this entity
        #[arg(long, short = 'e')]
        entity: Option<String>,
    },

    /// Unavailable entities and affected devices
    Issues,

    /// Changes recorded by the last index run
    Changes,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DIFF
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Older snapshot
    pub old: PathBuf,

    /// Newer snapshot
    pub new: PathBuf,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (tokens masked)
    Show,

    /// Print the config file path
    Path,

    /// Store an access token in the system keyring
    SetToken {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
