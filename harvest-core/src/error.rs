//! Error types for harvest-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `dirs::home_dir()`/`dirs::config_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("config not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Underlying I/O failure reading the config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML parse error on load — includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A required credential field is absent or empty.
    #[error("missing credential: '{field}' is absent or empty")]
    MissingCredential { field: &'static str },

    /// The configured `token_command` helper failed or produced nothing.
    #[error("token command `{command}` failed: {detail}")]
    TokenCommand { command: String, detail: String },
}

/// All errors that can arise from decoding event data, whether read back
/// from the local log or received from the remote feed.
#[derive(Debug, Error)]
pub enum DataError {
    /// The record is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The record has no `id` field.
    #[error("event record has no 'id' field")]
    MissingId,

    /// The `id` field is present but not a numeric string or number.
    #[error("event id {value} is not numeric")]
    BadId { value: String },

    /// A feed page body was not a JSON array.
    #[error("feed page body is not a JSON array")]
    NotAnArray,
}
