//! Canonical paths and scaffolding for `.checklist/`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

use super::config::{ChecklistConfig, write_config};

const CHECKLIST_GITIGNORE: &str = "store/*.tmp\n";

/// All canonical paths within `.checklist/` for a root directory.
#[derive(Debug, Clone)]
pub struct ChecklistPaths {
    pub root: PathBuf,
    pub checklist_dir: PathBuf,
    pub config_path: PathBuf,
    pub gitignore_path: PathBuf,
}

impl ChecklistPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let checklist_dir = root.join(".checklist");
        Self {
            root,
            config_path: checklist_dir.join("config.toml"),
            gitignore_path: checklist_dir.join(".gitignore"),
            checklist_dir,
        }
    }

    /// Store directory for a config's `store_dir` (relative to `.checklist/`).
    pub fn store_dir(&self, config: &ChecklistConfig) -> PathBuf {
        self.checklist_dir.join(&config.store_dir)
    }

    pub fn default_store_dir(&self) -> PathBuf {
        self.store_dir(&ChecklistConfig::default())
    }
}

/// Options for `init_checklist`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite an existing config.
    pub force: bool,
}

/// Create `.checklist/` with a default config in `root`.
///
/// Fails if the config already exists unless `options.force` is set. Stored
/// items are never touched.
pub fn init_checklist(root: &Path, options: &InitOptions) -> Result<ChecklistPaths> {
    let paths = ChecklistPaths::new(root);
    if paths.checklist_dir.exists() && !paths.checklist_dir.is_dir() {
        return Err(anyhow!(
            "checklist init: .checklist exists but is not a directory"
        ));
    }
    if paths.config_path.exists() && !options.force {
        return Err(anyhow!(
            "checklist init: config already exists (use --force to overwrite)"
        ));
    }

    let config = ChecklistConfig::default();
    create_dir(&paths.store_dir(&config))?;
    fs::write(&paths.gitignore_path, CHECKLIST_GITIGNORE)
        .with_context(|| format!("write file {}", paths.gitignore_path.display()))?;
    write_config(&paths.config_path, &config)?;
    Ok(paths)
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("create directory {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::load_config;

    #[test]
    fn init_creates_layout_with_default_config() {
        let temp = tempfile::tempdir().expect("tempdir");
        let paths = init_checklist(temp.path(), &InitOptions { force: false }).expect("init");
        assert!(paths.default_store_dir().is_dir());
        assert!(paths.gitignore_path.is_file());
        let cfg = load_config(&paths.config_path).expect("load");
        assert_eq!(cfg, ChecklistConfig::default());
    }

    #[test]
    fn init_twice_requires_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_checklist(temp.path(), &InitOptions { force: false }).expect("init");
        let err = init_checklist(temp.path(), &InitOptions { force: false }).unwrap_err();
        assert!(err.to_string().contains("--force"));
        init_checklist(temp.path(), &InitOptions { force: true }).expect("forced init");
    }

    #[test]
    fn init_keeps_stored_items() {
        let temp = tempfile::tempdir().expect("tempdir");
        crate::test_support::seed_root(temp.path(), &[crate::test_support::item("a", "A")])
            .expect("seed");
        let paths = init_checklist(temp.path(), &InitOptions { force: false }).expect("init");
        assert!(paths.default_store_dir().join("CHECKLIST_ITEMS_V1.json").is_file());
    }
}
