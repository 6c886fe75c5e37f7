// Core modules
pub mod config;
pub mod error;
pub mod paths;

// Re-export commonly used types
pub use config::{
    DiagnosticsConfig, ExecutableConfig, FormatConfig, SETTINGS_FILE_NAME, Settings,
};
pub use error::{AspenError, Result};
