use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::KeyrackError;

const DATA_DIR: &str = ".keyrack";
const CONFIG_FILE: &str = "config.toml";
const DATA_DIR_ENV: &str = "KEYRACK_DATA_DIR";

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Overrides the default `~/.keyrack` data directory.
    pub data_dir: Option<PathBuf>,
}

/// Returns the default data directory under the user's home.
pub fn home_data_dir() -> Result<PathBuf, KeyrackError> {
    let home = dirs::home_dir()
        .ok_or_else(|| KeyrackError::Config("Could not determine home directory.".into()))?;
    Ok(home.join(DATA_DIR))
}

/// Returns the config file path. The config file always lives in the
/// default location, even when it redirects the data directory elsewhere.
pub fn config_path() -> Result<PathBuf, KeyrackError> {
    Ok(home_data_dir()?.join(CONFIG_FILE))
}

/// Read and parse the config file. A missing file is not an error — it
/// reads as the default config.
pub fn read(path: &Path) -> Result<Config, KeyrackError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| KeyrackError::Config(e.to_string()))
}

/// Resolve the data directory: `KEYRACK_DATA_DIR` wins over the config
/// file's `data_dir`, which wins over `~/.keyrack`.
pub fn data_dir() -> Result<PathBuf, KeyrackError> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let config = read(&config_path()?)?;
    match config.data_dir {
        Some(dir) => Ok(dir),
        None => home_data_dir(),
    }
}
