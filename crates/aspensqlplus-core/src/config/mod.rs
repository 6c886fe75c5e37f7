//! Settings file model and discovery

pub mod consts;
pub mod model;

pub use consts::SETTINGS_FILE_NAME;
pub use model::{DiagnosticsConfig, ExecutableConfig, FormatConfig, Settings};

use std::path::{Path, PathBuf};

/// Find the nearest settings file, starting at `start` and walking up to the filesystem root
pub fn find_settings_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(SETTINGS_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
