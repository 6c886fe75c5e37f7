//! Building the formatter from a source checkout

use std::ffi::OsString;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use aspensqlplus_core::{AspenError, Result};
use tracing::debug;

use crate::install::platform::binary_name;

/// Directory, relative to the workspace root, holding the formatter's Cargo project
pub const SOURCE_PROJECT_DIR: &str = "formatter";

/// Runs the release build of a formatter source tree
#[derive(Debug, Clone)]
pub struct SourceBuilder {
    program: OsString,
}

impl Default for SourceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceBuilder {
    /// Builder driving `cargo` from PATH
    pub fn new() -> Self {
        Self::with_program("cargo")
    }

    /// Builder driving another cargo-compatible program
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Runs `<program> build --release` inside `project_dir`
    ///
    /// # Errors
    ///
    /// Returns `BuildError` carrying the captured error stream when the build exits
    /// non-zero, or naming the program when it cannot be started.
    pub fn build(&self, project_dir: &Path) -> Result<()> {
        let program = self.program.to_string_lossy();
        debug!("building {} with {}", project_dir.display(), program);

        let mut child = Command::new(&self.program)
            .args(["build", "--release"])
            .current_dir(project_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AspenError::BuildError(format!("failed to start '{}': {}", program, e)))?;

        // stdout is discarded, so draining stderr on this thread cannot deadlock.
        let mut stderr = String::new();
        if let Some(pipe) = child.stderr.take() {
            let mut reader = BufReader::new(pipe);
            let mut buf = Vec::new();
            // Compiler output is not guaranteed UTF-8; keep reading to EOF either way.
            while matches!(reader.read_until(b'\n', &mut buf), Ok(n) if n > 0) {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']);
                debug!(target: "aspensqlplus_tool::build", "{}", line);
                stderr.push_str(line);
                stderr.push('\n');
                buf.clear();
            }
        }

        let status = child.wait().map_err(|e| {
            AspenError::BuildError(format!("failed to wait for '{}': {}", program, e))
        })?;

        if status.success() {
            return Ok(());
        }

        let detail = stderr.trim();
        Err(AspenError::BuildError(if detail.is_empty() {
            match status.code() {
                Some(code) => format!("build exited with code {}", code),
                None => "build was terminated by a signal".to_string(),
            }
        } else {
            detail.to_string()
        }))
    }
}

/// The formatter project inside `workspace_root`, if one is checked out there
pub fn source_project(workspace_root: &Path) -> Option<PathBuf> {
    let project = workspace_root.join(SOURCE_PROJECT_DIR);
    project.join("Cargo.toml").is_file().then_some(project)
}

pub fn release_output(project_dir: &Path) -> PathBuf {
    project_dir.join("target").join("release").join(binary_name())
}

pub fn debug_output(project_dir: &Path) -> PathBuf {
    project_dir.join("target").join("debug").join(binary_name())
}
