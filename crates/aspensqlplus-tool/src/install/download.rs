//! Release archive download and extraction
//!
//! [`ArchiveFetcher`] streams a release archive into a temporary file inside the
//! destination directory, unpacks every entry next to it and then tidies up:
//!
//! - the temporary archive is removed (best-effort)
//! - the formatter executable is hoisted to the top level if the archive nested it
//! - on Unix the executable gets its user-execute bit (best-effort)
//!
//! # Example
//!
//! ```no_run
//! use aspensqlplus_tool::install::{ArchiveFetcher, PlatformTriple, release_archive_url};
//! use std::path::Path;
//! use url::Url;
//!
//! # fn example() -> aspensqlplus_core::Result<()> {
//! let base = Url::parse("https://github.com/aspensqlplus/aspensqlplus-fmt/releases/download").unwrap();
//! let url = release_archive_url(&base, "0.1.0", &PlatformTriple::current())?;
//! ArchiveFetcher::new().fetch_and_extract(&url, Path::new("/tmp/aspensqlplus"))?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use aspensqlplus_core::{AspenError, Result};
use tracing::debug;
use url::Url;

use crate::http::{ARCHIVE_TIMEOUT, build_client};
use crate::install::platform::binary_name;

/// Downloads a release archive and unpacks it into a directory
#[derive(Debug, Clone)]
pub struct ArchiveFetcher {
    timeout: Duration,
}

impl Default for ArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveFetcher {
    pub fn new() -> Self {
        Self {
            timeout: ARCHIVE_TIMEOUT,
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Downloads `url` and extracts it into `destination`, overwriting existing files
    ///
    /// # Errors
    ///
    /// - `NetworkError` if the request fails or the server answers with a 4xx/5xx status
    /// - `IoError` if the archive cannot be written, read or unpacked
    pub fn fetch_and_extract(&self, url: &Url, destination: &Path) -> Result<()> {
        fs::create_dir_all(destination)
            .map_err(|e| AspenError::io(format!("create {}", destination.display()), e))?;

        let archive_path = self.download_into(url, destination)?;
        let extracted = extract_zip(&archive_path, destination);

        // Best-effort: a leftover archive only wastes disk space.
        if let Err(e) = fs::remove_file(&archive_path) {
            debug!("could not remove {}: {}", archive_path.display(), e);
        }

        extracted?;

        if let Some(executable) = hoist_executable(destination)? {
            // Best-effort: the caller still finds the file and a spawn error names it.
            if let Err(e) = mark_executable(&executable) {
                debug!("could not mark {} executable: {}", executable.display(), e);
            }
        }

        Ok(())
    }

    /// Streams the response body into a temporary `.zip` inside `dir`
    fn download_into(&self, url: &Url, dir: &Path) -> Result<PathBuf> {
        let network_error = |reason: String| AspenError::NetworkError {
            url: url.to_string(),
            reason,
        };

        let client = build_client(self.timeout).map_err(|e| network_error(e.to_string()))?;

        debug!("downloading {}", url);
        let mut response = client
            .get(url.as_str())
            .send()
            .map_err(|e| network_error(e.without_url().to_string()))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(network_error(format!("server responded with {}", status)));
        }

        let mut temp_file = tempfile::Builder::new()
            .prefix(".download-")
            .suffix(".zip")
            .tempfile_in(dir)
            .map_err(|e| AspenError::io("create temporary file for download", e))?;

        let mut downloaded: u64 = 0;
        let mut buffer = [0; 8192];

        loop {
            let bytes_read = response
                .read(&mut buffer)
                .map_err(|e| network_error(format!("reading response body: {}", e)))?;

            if bytes_read == 0 {
                break;
            }

            temp_file
                .write_all(&buffer[..bytes_read])
                .map_err(|e| AspenError::io("write to temporary file", e))?;

            downloaded += bytes_read as u64;
        }

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| AspenError::io("sync temporary file", e))?;

        debug!("downloaded {} bytes from {}", downloaded, url);

        temp_file
            .into_temp_path()
            .keep()
            .map_err(|e| AspenError::io("persist temporary file", e.error))
    }
}

fn zip_error(e: zip::result::ZipError) -> AspenError {
    AspenError::io("read zip archive", io::Error::other(e))
}

/// Extracts every entry of a .zip archive into `dest_dir`
///
/// Entries whose names would land outside `dest_dir` are skipped.
fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = fs::File::open(archive_path)
        .map_err(|e| AspenError::io(format!("open archive {}", archive_path.display()), e))?;

    let mut archive = zip::ZipArchive::new(file).map_err(zip_error)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(zip_error)?;

        let outpath = match entry.enclosed_name() {
            Some(path) => dest_dir.join(path),
            None => {
                debug!("skipping unsafe archive entry {}", entry.name());
                continue;
            }
        };

        if entry.is_dir() {
            fs::create_dir_all(&outpath)
                .map_err(|e| AspenError::io(format!("create directory {}", outpath.display()), e))?;
            continue;
        }

        if let Some(parent) = outpath.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AspenError::io(format!("create parent directory {}", parent.display()), e)
            })?;
        }

        let mut outfile = fs::File::create(&outpath)
            .map_err(|e| AspenError::io(format!("create file {}", outpath.display()), e))?;

        io::copy(&mut entry, &mut outfile)
            .map_err(|e| AspenError::io(format!("extract file {}", outpath.display()), e))?;
    }

    Ok(())
}

/// Finds the formatter executable in `dir` and moves it to the top level when nested
///
/// Returns `None` when the archive did not contain it.
fn hoist_executable(dir: &Path) -> Result<Option<PathBuf>> {
    let top_level = dir.join(binary_name());
    if top_level.is_file() {
        return Ok(Some(top_level));
    }

    let nested = walkdir::WalkDir::new(dir)
        .min_depth(2)
        .max_depth(3)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == binary_name());

    match nested {
        Some(entry) => {
            fs::rename(entry.path(), &top_level).map_err(|e| {
                AspenError::io(format!("move {} into place", entry.path().display()), e)
            })?;
            Ok(Some(top_level))
        }
        None => Ok(None),
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o100);
    fs::set_permissions(path, permissions)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}
