//! Application configuration for VendorMetrics.
//!
//! User config lives at `~/.vendormetrics/vendormetrics.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VendorMetricsError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "vendormetrics.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".vendormetrics";

// ---------------------------------------------------------------------------
// Config structs (matching vendormetrics.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Path to the SQLite inventory database.
    #[serde(default = "default_database")]
    pub database: String,

    /// Directory scanned for delimited source files.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Append-only run log file.
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// Rows per insert transaction when bulk-loading a table.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            data_dir: default_data_dir(),
            log_file: default_log_file(),
            chunk_size: default_chunk_size(),
        }
    }
}

fn default_database() -> String {
    "inventory.db".into()
}
fn default_data_dir() -> String {
    "data".into()
}
fn default_log_file() -> String {
    "logs/vendormetrics.log".into()
}
fn default_chunk_size() -> usize {
    10_000
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.vendormetrics/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| VendorMetricsError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.vendormetrics/vendormetrics.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| VendorMetricsError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        VendorMetricsError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| VendorMetricsError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| VendorMetricsError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| VendorMetricsError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
