//! Harvest configuration.
//!
//! # Storage layout
//!
//! ```text
//! <config_dir>/harvest/config.yml       (credentials + overrides)
//! <documents_dir>/harvest/events.jsonl  (the event log, default location)
//! ```
//!
//! The config file is the only thing this tool reads from the credential
//! store; it consumes a `(login, token)` pair and fails fast when either
//! is missing. The token may instead come from an external helper command
//! (`token_command`), run once per invocation.
//!
//! # API pattern
//!
//! Loading has two forms:
//! - `load_from(path)` — explicit path; used in tests with `TempDir`
//! - `load()` — resolves the path from `$HARVEST_CONFIG` or the platform
//!   config directory, delegates to `load_from`
//!
//! Tests must NEVER call `load()`; always use `load_from`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "HARVEST_CONFIG";

/// Default base URL of the remote event feed.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const CONFIG_DIR: &str = "harvest";
const CONFIG_FILE: &str = "config.yml";
const LOG_DIR: &str = "harvest";
const LOG_FILE: &str = "events.jsonl";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Fully-resolved runtime configuration, validated on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Account whose activity feed is fetched.
    pub login: String,
    /// Bearer credential for the feed.
    pub token: String,
    /// Base URL of the feed API.
    pub api_url: String,
    /// Path of the append-only event log.
    pub log_path: PathBuf,
}

/// On-disk config shape. Everything except `login` is optional; the token
/// must come from exactly one of `token` / `token_command`.
#[derive(Debug, Deserialize)]
struct ConfigFileModel {
    login: Option<String>,
    token: Option<String>,
    token_command: Option<String>,
    api_url: Option<String>,
    log_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Path resolution
// ---------------------------------------------------------------------------

/// `<config_dir>/harvest/config.yml`, unless `$HARVEST_CONFIG` points
/// elsewhere. Pure, no I/O.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }
    let dir = dirs::config_dir().ok_or(ConfigError::HomeNotFound)?;
    Ok(dir.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// `<documents_dir>/harvest/events.jsonl`, falling back to
/// `<home>/Documents/harvest/events.jsonl` when the platform has no
/// documents directory.
pub fn default_log_path() -> Result<PathBuf, ConfigError> {
    let documents = match dirs::document_dir() {
        Some(dir) => dir,
        None => dirs::home_dir()
            .ok_or(ConfigError::HomeNotFound)?
            .join("Documents"),
    };
    Ok(documents.join(LOG_DIR).join(LOG_FILE))
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Load and validate the config from the conventional location.
pub fn load() -> Result<Config, ConfigError> {
    load_from(&config_path()?)
}

/// Load and validate the config from an explicit path.
///
/// Returns `ConfigError::ConfigNotFound` if absent,
/// `ConfigError::Parse` (with path + line context) if malformed YAML, and
/// `ConfigError::MissingCredential` when `login` or the token is absent
/// or empty — all before any network I/O happens.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let model: ConfigFileModel =
        serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let login = match model.login.as_deref().map(str::trim) {
        Some(login) if !login.is_empty() => login.to_owned(),
        _ => return Err(ConfigError::MissingCredential { field: "login" }),
    };
    let token = resolve_token(&model)?;

    let log_path = match model.log_path {
        Some(path) => path,
        None => default_log_path()?,
    };

    Ok(Config {
        login,
        token,
        api_url: model
            .api_url
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
            .trim_end_matches('/')
            .to_owned(),
        log_path,
    })
}

/// Resolve the bearer token: an inline `token` wins, otherwise
/// `token_command` is run through `sh -c` and its trimmed stdout is used.
fn resolve_token(model: &ConfigFileModel) -> Result<String, ConfigError> {
    if let Some(token) = model.token.as_deref().map(str::trim) {
        if !token.is_empty() {
            return Ok(token.to_owned());
        }
    }

    let Some(command) = model.token_command.as_deref() else {
        return Err(ConfigError::MissingCredential { field: "token" });
    };

    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|e| ConfigError::TokenCommand {
            command: command.to_owned(),
            detail: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(ConfigError::TokenCommand {
            command: command.to_owned(),
            detail: format!(
                "exit status {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_owned();
    if token.is_empty() {
        return Err(ConfigError::TokenCommand {
            command: command.to_owned(),
            detail: "produced no output".to_owned(),
        });
    }
    Ok(token)
}
