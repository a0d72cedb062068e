use crate::storage::EngineKind;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Defaults read from `psm-db.toml`. Command-line flags take precedence.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PsmConfig {
    pub db_file: Option<PathBuf>,
    pub engine: Option<EngineKind>,
    pub sqlite3: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
    pub verbose: Option<bool>,
}

pub const DEFAULT_SQLITE3: &str = "sqlite3";

pub fn default_config_path() -> PathBuf {
    PathBuf::from("psm-db.toml")
}

/// Load the config file.
///
/// An explicit path must exist; the default path is optional.
pub fn load_config(path: Option<&Path>) -> Result<Option<PsmConfig>> {
    let explicit = path.is_some();
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        if explicit {
            return Err(Error::FileNotFound { what: "Config file", path });
        }
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: PsmConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    Ok(Some(config))
}

/// Create the parent directory of `path` if needed
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
