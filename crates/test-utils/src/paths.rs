//! Filesystem helpers for tests that serve static assets.

use std::fs;
use tempfile::TempDir;

/// Create a temporary directory populated with `(relative_path, contents)` files.
///
/// The directory is removed when the returned guard is dropped.
pub fn temp_asset_dir(files: &[(&str, &[u8])]) -> std::io::Result<TempDir> {
    let dir = tempfile::tempdir()?;
    for (rel, contents) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
    }
    Ok(dir)
}
