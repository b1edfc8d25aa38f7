use std::path::PathBuf;

use thiserror::Error;

/// Failures while locating, parsing or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {origin}: toml error: {toml}; json error: {json}")]
    Parse {
        origin: String,
        toml: String,
        json: String,
    },

    #[error("invalid inline config json")]
    InlineJson(#[source] serde_json::Error),

    #[error("invalid backend url '{value}'")]
    InvalidBackendUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend url '{0}' must use http or https")]
    UnsupportedScheme(String),

    #[error("camera index '{value}' is not a number")]
    InvalidCameraIndex {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("jpeg_quality must be between 1 and 100, got {0}")]
    InvalidJpegQuality(u8),

    #[error("notification_ttl_ms must be greater than zero")]
    ZeroNotificationTtl,
}
