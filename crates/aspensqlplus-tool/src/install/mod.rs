pub mod download;
pub mod platform;
pub mod url;

// Re-export for convenience
pub use download::ArchiveFetcher;
pub use platform::{Os, PlatformTriple, TOOL_NAME, archive_name, binary_name};
pub use self::url::{DEFAULT_RELEASE_BASE_URL, default_release_base_url, release_archive_url};
