//! In-memory release archives
//!
//! Tests serve these from a mock server instead of downloading real releases.

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds a .zip archive holding `entries` as `(name, contents)` pairs
///
/// # Panics
///
/// Panics if the archive cannot be written (only possible on allocation failure).
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    build_zip(entries, SimpleFileOptions::default())
}

/// Builds a .zip archive with a single executable entry
pub fn zip_with_executable(name: &str, script: &str) -> Vec<u8> {
    build_zip(
        &[(name, script.as_bytes())],
        SimpleFileOptions::default().unix_permissions(0o755),
    )
}

fn build_zip(entries: &[(&str, &[u8])], options: SimpleFileOptions) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, options)
            .expect("Failed to start zip entry");
        writer
            .write_all(contents)
            .expect("Failed to write zip entry");
    }
    writer
        .finish()
        .expect("Failed to finish zip archive")
        .into_inner()
}
