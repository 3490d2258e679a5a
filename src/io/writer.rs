//! Stub file output.

use crate::errors::{IoResultExt, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Replace `path` with `content`, unconditionally.
///
/// The text goes to a sibling temporary file first and is then renamed over
/// the target, so readers never observe a partially written stub.
pub fn write_stub(path: &Path, content: &str) -> Result<()> {
    let staging = staging_path(path);
    fs::write(&staging, content).with_path(&staging)?;
    if let Err(e) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(e).with_path(path);
    }
    Ok(())
}

/// Whether `path` already holds exactly `content`. A missing file is stale.
pub fn is_up_to_date(path: &Path, content: &str) -> Result<bool> {
    match fs::read(path) {
        Ok(existing) => Ok(existing == content.as_bytes()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e).with_path(path),
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
