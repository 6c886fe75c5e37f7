//! Defaults shared by the settings model and its consumers

/// Name of the settings file looked up from the working directory upwards
pub const SETTINGS_FILE_NAME: &str = "aspensqlplus.toml";

/// Release of the formatter binary fetched when none is configured
pub const DEFAULT_RELEASE_VERSION: &str = "0.1.0";

/// Formatting defaults, matching the formatter binary's own flag defaults
pub mod format {
    /// Maximum line width
    pub const DEFAULT_LINE_WIDTH: usize = 88;

    /// Indentation spaces
    pub const DEFAULT_INDENT_WIDTH: u8 = 2;

    /// Smallest indentation the formatter accepts
    pub const MIN_INDENT_WIDTH: u8 = 2;

    /// Largest indentation the formatter accepts
    pub const MAX_INDENT_WIDTH: u8 = 4;
}

/// Diagnostic categories reported by the formatter's check mode
pub mod diagnostics {
    pub const UNUSED_VARIABLE: &str = "unused-variable";
    pub const DUPLICATE_VARIABLE: &str = "duplicate-variable";

    /// Every category the formatter is known to emit
    pub const KNOWN_CATEGORIES: &[&str] = &[UNUSED_VARIABLE, DUPLICATE_VARIABLE];
}
