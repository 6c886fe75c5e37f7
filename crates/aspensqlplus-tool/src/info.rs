use serde::Serialize;
use std::ffi::OsStr;
use std::fmt;
use std::path::PathBuf;

/// Where a resolved executable came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Custom,
    Bundled,
    Cached,
    Downloaded,
    Built,
    Path,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Custom => write!(f, "custom path"),
            Tier::Bundled => write!(f, "bundled binary"),
            Tier::Cached => write!(f, "local cache"),
            Tier::Downloaded => write!(f, "release download"),
            Tier::Built => write!(f, "source build"),
            Tier::Path => write!(f, "system PATH"),
        }
    }
}

/// An executable to spawn: a filesystem path, or a bare name looked up on PATH at spawn time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExecutableLocation {
    Path(PathBuf),
    Command(String),
}

impl ExecutableLocation {
    /// Program argument for `std::process::Command::new`
    pub fn program(&self) -> &OsStr {
        match self {
            ExecutableLocation::Path(path) => path.as_os_str(),
            ExecutableLocation::Command(name) => OsStr::new(name),
        }
    }
}

impl fmt::Display for ExecutableLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutableLocation::Path(path) => write!(f, "{}", path.display()),
            ExecutableLocation::Command(name) => write!(f, "{}", name),
        }
    }
}
