//! Checklist configuration stored under `.checklist/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::atomic::write_atomic;
use super::gateway::DEFAULT_STORAGE_KEY;
use super::kv::validate_key;
use crate::persist::PersistMode;

/// Checklist configuration (TOML).
///
/// Meant to be edited by hand. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChecklistConfig {
    /// Key the whole collection is stored under.
    pub storage_key: String,

    /// Directory holding stored values, relative to `.checklist/`.
    pub store_dir: String,

    /// Pretty-print stored JSON.
    pub pretty: bool,

    pub persist: PersistConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PersistConfig {
    pub mode: PersistMode,
}

impl Default for ChecklistConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            store_dir: "store".to_string(),
            pretty: true,
            persist: PersistConfig::default(),
        }
    }
}

impl ChecklistConfig {
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.storage_key)?;
        if self.store_dir.trim().is_empty() {
            return Err(anyhow!("store_dir must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ChecklistConfig::default()`.
pub fn load_config(path: &Path) -> Result<ChecklistConfig> {
    if !path.exists() {
        let cfg = ChecklistConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ChecklistConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ChecklistConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf, "toml.tmp")
}
