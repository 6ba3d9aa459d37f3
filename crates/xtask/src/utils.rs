//! Utility functions for xtask commands

use std::path::{Path, PathBuf};

/// Get the directory holding bundled tactics content
///
/// `TACTICS_DATA_DIR` overrides the bundled `crates/tactics/content/data`.
pub fn data_dir() -> PathBuf {
    std::env::var_os("TACTICS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            Path::new(env!("CARGO_MANIFEST_DIR")).join("../tactics/content/data")
        })
}

/// Resolve a user-supplied path
///
/// Existing paths are used as given; anything else is looked up inside the
/// data directory.
pub fn resolve(path: &Path) -> PathBuf {
    if path.exists() || path.is_absolute() {
        return path.to_path_buf();
    }
    data_dir().join(path)
}
