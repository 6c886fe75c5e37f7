use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::consts::diagnostics::KNOWN_CATEGORIES;
use super::consts::{DEFAULT_RELEASE_VERSION, format};
use crate::error::{AspenError, Result};

/// aspensqlplus.toml schema
///
/// Every table is optional; a missing file and an empty file both produce the defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub executable: ExecutableConfig,
    #[serde(default)]
    pub format: FormatConfig,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Where the formatter binary comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutableConfig {
    /// Explicit executable override, trusted as-is
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_true")]
    pub auto_build: bool,
    #[serde(default = "default_true")]
    pub auto_download: bool,
    /// Release fetched by the download tier
    #[serde(default = "default_version")]
    pub version: String,
}

impl Default for ExecutableConfig {
    fn default() -> Self {
        Self {
            path: None,
            auto_build: true,
            auto_download: true,
            version: default_version(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatConfig {
    #[serde(default = "default_line_width")]
    pub line_width: usize,
    #[serde(default = "default_indent_width")]
    pub indent_width: u8,
    #[serde(default = "default_true")]
    pub uppercase_keywords: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            line_width: format::DEFAULT_LINE_WIDTH,
            indent_width: format::DEFAULT_INDENT_WIDTH,
            uppercase_keywords: true,
        }
    }
}

/// Per-category enable flags, keyed by diagnostic code
///
/// Categories that are not listed count as enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(flatten)]
    pub categories: BTreeMap<String, bool>,
}

impl DiagnosticsConfig {
    pub fn is_enabled(&self, code: &str) -> bool {
        self.categories.get(code).copied().unwrap_or(true)
    }

    /// Listed categories the formatter is not known to emit, usually typos
    pub fn unknown_categories(&self) -> Vec<&str> {
        self.categories
            .keys()
            .map(String::as_str)
            .filter(|code| !KNOWN_CATEGORIES.contains(code))
            .collect()
    }
}

fn default_true() -> bool {
    true
}

fn default_version() -> String {
    DEFAULT_RELEASE_VERSION.to_string()
}

fn default_line_width() -> usize {
    format::DEFAULT_LINE_WIDTH
}

fn default_indent_width() -> u8 {
    format::DEFAULT_INDENT_WIDTH
}

impl Settings {
    /// Read and validate aspensqlplus.toml
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AspenError::ConfigParseError(format!("failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(content).map_err(|e| AspenError::ConfigParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load the nearest settings file above `start`, or the defaults when there is none
    pub fn discover(start: &Path) -> Result<Self> {
        match super::find_settings_file(start) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.format.line_width == 0 {
            return Err(AspenError::ConfigInvalidValue {
                field: "format.line_width".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let indent = self.format.indent_width;
        if !(format::MIN_INDENT_WIDTH..=format::MAX_INDENT_WIDTH).contains(&indent) {
            return Err(AspenError::ConfigInvalidValue {
                field: "format.indent_width".to_string(),
                reason: format!(
                    "{} is outside {}..={}",
                    indent,
                    format::MIN_INDENT_WIDTH,
                    format::MAX_INDENT_WIDTH
                ),
            });
        }

        if self.executable.version.trim().is_empty() {
            return Err(AspenError::ConfigInvalidValue {
                field: "executable.version".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
