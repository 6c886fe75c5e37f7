//! Default on-disk locations

use std::path::{Path, PathBuf};

use crate::error::{AspenError, Result};

/// Environment variable overriding the storage root
pub const CACHE_DIR_ENV: &str = "ASPENSQLPLUS_CACHE_DIR";

/// Environment variable overriding the bundle root
pub const BUNDLE_DIR_ENV: &str = "ASPENSQLPLUS_BUNDLE_DIR";

/// Environment variable overriding the release download base URL
pub const RELEASE_BASE_URL_ENV: &str = "ASPENSQLPLUS_RELEASE_BASE_URL";

/// Per-user storage root for downloaded formatter binaries
///
/// Platform-specific paths:
/// - macOS: ~/Library/Caches/aspensqlplus
/// - Linux: ~/.cache/aspensqlplus
/// - Windows: %LOCALAPPDATA%\aspensqlplus
pub fn default_storage_root() -> Result<PathBuf> {
    let base = dirs::cache_dir()
        .ok_or_else(|| AspenError::Generic("Could not determine cache directory".to_string()))?;

    Ok(base.join("aspensqlplus"))
}

/// Picks the override when one is set and non-blank, else the default
pub fn storage_root_or(override_dir: Option<&str>) -> Result<PathBuf> {
    match non_blank(override_dir) {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => default_storage_root(),
    }
}

/// Bundle root: the override when set and non-blank, else the directory holding `executable`
pub fn bundle_root_or(override_dir: Option<&str>, executable: &Path) -> Option<PathBuf> {
    match non_blank(override_dir) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => executable.parent().map(Path::to_path_buf),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
