//! Release archive URL construction

use url::Url;

use super::platform::{PlatformTriple, archive_name};
use aspensqlplus_core::{AspenError, Result};

/// Where published formatter releases live
pub const DEFAULT_RELEASE_BASE_URL: &str =
    "https://github.com/aspensqlplus/aspensqlplus-fmt/releases/download";

pub fn default_release_base_url() -> std::result::Result<Url, url::ParseError> {
    Url::parse(DEFAULT_RELEASE_BASE_URL)
}

/// Builds `<base>/v<version>/aspensqlplus-fmt-<version>-<os>-<arch>.zip`
///
/// A leading `v` on `version` is tolerated so both `0.2.0` and `v0.2.0` work.
pub fn release_archive_url(base: &Url, version: &str, triple: &PlatformTriple) -> Result<Url> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    let tag = format!("v{}", version);
    let file = archive_name(version, triple);

    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| {
            AspenError::Generic(format!("release base URL cannot be a base: {}", base))
        })?
        .pop_if_empty()
        .extend([tag.as_str(), file.as_str()]);
    Ok(url)
}
