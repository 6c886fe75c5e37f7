//! CLI command implementations

pub mod check;
pub mod doctor;
pub mod format;
pub mod resolve;

use anyhow::{Context as _, Result};
use std::io::Read;
use std::path::Path;

/// Reads the document from `file`, or from stdin when no file is given
pub(crate) fn read_document(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}
