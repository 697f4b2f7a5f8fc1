//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use hassdex_config::ConfigError;
use hassdex_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to hub at {url}")]
    #[diagnostic(
        code(hassdex::connection_failed),
        help(
            "Check that the hub is running and reachable: {reason}\n\
             For a self-signed certificate try: hassdex index --insecure"
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(hassdex::timeout),
        help("Increase the timeout with --timeout or check hub responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(hassdex::auth_failed),
        help(
            "Verify the long-lived access token (Profile > Security on the hub).\n\
             Store a new one with: hassdex config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No access token configured for profile '{profile}'")]
    #[diagnostic(
        code(hassdex::no_credentials),
        help(
            "Configure one with: hassdex config init\n\
             Or pass --token / --token-file, or set HASSDEX_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    #[error("Cannot read token file {path}")]
    #[diagnostic(
        code(hassdex::token_file),
        help("Check that the file exists and is readable by this user.")
    )]
    TokenFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ── Snapshots ────────────────────────────────────────────────────

    #[error("No snapshot at {path}")]
    #[diagnostic(
        code(hassdex::index_not_found),
        help("Create one with: hassdex index")
    )]
    IndexNotFound { path: String },

    #[error("Snapshot {path} is unusable: {reason}")]
    #[diagnostic(
        code(hassdex::snapshot),
        help("Move the file aside and run: hassdex index")
    )]
    Snapshot { path: String, reason: String },

    // ── Hub API ──────────────────────────────────────────────────────

    #[error("Hub API error ({status}): {message}")]
    #[diagnostic(code(hassdex::api_error))]
    Api { status: String, message: String },

    #[error("Unexpected response from hub: {message}")]
    #[diagnostic(
        code(hassdex::invalid_response),
        help("Is the URL pointing at the hub itself rather than a proxy login page?")
    )]
    InvalidResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(hassdex::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(hassdex::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: hassdex config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No hub configured")]
    #[diagnostic(
        code(hassdex::no_config),
        help(
            "Create a profile with: hassdex config init\n\
             Or pass --hub. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(hassdex::config))]
    Config(Box<figment::Error>),

    // ── IO ───────────────────────────────────────────────────────────

    #[error("I/O error on {path}: {source}")]
    #[diagnostic(code(hassdex::io))]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } | Self::TokenFile { .. } => {
                exit_code::AUTH
            }
            Self::IndexNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed { url, reason },
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Timeout { url } => CliError::Timeout { url },
            CoreError::Api { message, status } => CliError::Api {
                status: status.map_or_else(|| "-".into(), |s| s.to_string()),
                message,
            },
            CoreError::InvalidResponse { message } => CliError::InvalidResponse { message },
            CoreError::Snapshot { path, reason } => CliError::Snapshot {
                path: path.display().to_string(),
                reason,
            },
            CoreError::SnapshotMissing { path } => CliError::IndexNotFound {
                path: path.display().to_string(),
            },
            CoreError::Io { path, source } => CliError::FileIo {
                path: path.display().to_string(),
                source,
            },
            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::TokenFile { path, source } => CliError::TokenFile {
                path: path.display().to_string(),
                source,
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
