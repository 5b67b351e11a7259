//! Whole-file replacement via temp file + rename.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Write `contents` to `path` so readers never see a torn file.
///
/// The temp file sits next to `path` with extension `tmp_extension`
/// (e.g. `json.tmp`). Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &str, tmp_extension: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension(tmp_extension);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}
