// ── Core error types ──
//
// User-facing errors from hassdex-core. Consumers never see HTTP status
// codes or raw reqwest errors directly: the `From<hassdex_api::Error>`
// impl translates transport-layer errors into domain-appropriate variants.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to hub at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected response from hub: {message}")]
    InvalidResponse { message: String },

    // ── Snapshot files ───────────────────────────────────────────────
    #[error("Snapshot {path} is unusable: {reason}")]
    Snapshot { path: PathBuf, reason: String },

    #[error("No snapshot at {path}")]
    SnapshotMissing { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<hassdex_api::Error> for CoreError {
    fn from(err: hassdex_api::Error) -> Self {
        match err {
            hassdex_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            hassdex_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() || e.is_request() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            hassdex_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            hassdex_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            hassdex_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            hassdex_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_maps_through() {
        let err = CoreError::from(hassdex_api::Error::Authentication {
            message: "nope".into(),
        });
        assert!(matches!(err, CoreError::AuthenticationFailed { message } if message == "nope"));
    }

    #[test]
    fn api_status_is_preserved() {
        let err = CoreError::from(hassdex_api::Error::Api {
            status: 500,
            message: "boom".into(),
        });
        assert!(matches!(err, CoreError::Api { status: Some(500), .. }));
    }

    #[test]
    fn deserialization_becomes_invalid_response() {
        let err = CoreError::from(hassdex_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::InvalidResponse { .. }));
    }
}
