//! Write-new-then-rename file replacement.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::OutputError;

/// Temporary sibling used while `path` is being written.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `bytes` to a temporary sibling, syncs it, then renames it over
/// `path`. Readers see either the old file or the complete new one.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| OutputError::io("create directory", parent, e))?;
    }

    let temp = temp_path(path);
    let mut file = File::create(&temp).map_err(|e| OutputError::io("create", &temp, e))?;
    file.write_all(bytes)
        .map_err(|e| OutputError::io("write", &temp, e))?;
    file.sync_all()
        .map_err(|e| OutputError::io("sync", &temp, e))?;
    drop(file);

    fs::rename(&temp, path).map_err(|source| OutputError::AtomicWriteFailed {
        temp_path: temp.clone(),
        target_path: path.to_path_buf(),
        source,
    })
}
