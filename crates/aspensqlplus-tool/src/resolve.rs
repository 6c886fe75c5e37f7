//! Locating (or obtaining) the formatter executable
//!
//! Resolution walks a fixed list of tiers and stops at the first hit:
//!
//! ```text
//! custom path  ->  bundled  ->  cache  ->  release download  ->  source build  ->  PATH name
//! ```
//!
//! It never fails. Download and build problems become [`ResolveWarning`]s and the
//! walk continues; the last tier always yields the bare executable name.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use aspensqlplus_core::{ExecutableConfig, Result};
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::build::{self, SourceBuilder};
use crate::info::{ExecutableLocation, Tier};
use crate::install::{ArchiveFetcher, PlatformTriple, binary_name, release_archive_url};

/// Per-call resolution options, supplied fresh on every resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionOptions {
    pub custom_path: Option<String>,
    pub auto_build: bool,
    pub auto_download: bool,
    pub release_version: String,
}

impl From<&ExecutableConfig> for ResolutionOptions {
    fn from(config: &ExecutableConfig) -> Self {
        Self {
            custom_path: config.path.clone(),
            auto_build: config.auto_build,
            auto_download: config.auto_download,
            release_version: config.version.clone(),
        }
    }
}

/// Filesystem and network locations the resolver works against
#[derive(Debug, Clone)]
pub struct ResolverEnv {
    /// Root of the on-disk cache; one subdirectory per platform triple lives below it
    pub storage_root: PathBuf,
    /// Root holding `bin/<triple>/` with prebuilt executables shipped alongside the caller
    pub bundle_root: Option<PathBuf>,
    /// Workspace that may contain a formatter source checkout
    pub workspace_root: Option<PathBuf>,
    pub release_base_url: Url,
    pub platform: PlatformTriple,
}

impl ResolverEnv {
    pub fn new(storage_root: impl Into<PathBuf>, release_base_url: Url) -> Self {
        Self {
            storage_root: storage_root.into(),
            bundle_root: None,
            workspace_root: None,
            release_base_url,
            platform: PlatformTriple::current(),
        }
    }

    pub fn with_bundle_root(mut self, bundle_root: impl Into<PathBuf>) -> Self {
        self.bundle_root = Some(bundle_root.into());
        self
    }

    pub fn with_workspace_root(mut self, workspace_root: impl Into<PathBuf>) -> Self {
        self.workspace_root = Some(workspace_root.into());
        self
    }

    /// Per-platform cache subdirectory
    pub fn cache_dir(&self) -> PathBuf {
        self.storage_root.join(self.platform.to_string())
    }

    pub fn cached_binary_path(&self) -> PathBuf {
        self.cache_dir().join(binary_name())
    }

    pub fn bundled_binary_path(&self) -> Option<PathBuf> {
        self.bundle_root.as_ref().map(|root| {
            root.join("bin")
                .join(self.platform.to_string())
                .join(binary_name())
        })
    }
}

/// A download or build failure that was stepped over
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveWarning {
    pub tier: Tier,
    pub message: String,
}

impl fmt::Display for ResolveWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.tier, self.message)
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub location: ExecutableLocation,
    pub tier: Tier,
    pub warnings: Vec<ResolveWarning>,
}

/// Fetches a release archive into a directory
pub trait FetchArchive {
    fn fetch_and_extract(&self, url: &Url, destination: &Path) -> Result<()>;
}

impl FetchArchive for ArchiveFetcher {
    fn fetch_and_extract(&self, url: &Url, destination: &Path) -> Result<()> {
        ArchiveFetcher::fetch_and_extract(self, url, destination)
    }
}

/// Builds a formatter source project
pub trait BuildSource {
    fn build(&self, project_dir: &Path) -> Result<()>;
}

impl BuildSource for SourceBuilder {
    fn build(&self, project_dir: &Path) -> Result<()> {
        SourceBuilder::build(self, project_dir)
    }
}

type Probe<F, B> =
    fn(&BinaryResolver<F, B>, &ResolutionOptions, &mut Vec<ResolveWarning>) -> Option<PathBuf>;

/// Fallback-chain resolver for the formatter executable
#[derive(Debug, Clone)]
pub struct BinaryResolver<F = ArchiveFetcher, B = SourceBuilder> {
    env: ResolverEnv,
    fetcher: F,
    builder: B,
}

impl BinaryResolver {
    /// Resolver downloading over HTTPS and building with `cargo`
    pub fn new(env: ResolverEnv) -> Self {
        Self::with_parts(env, ArchiveFetcher::new(), SourceBuilder::new())
    }
}

impl<F: FetchArchive, B: BuildSource> BinaryResolver<F, B> {
    pub fn with_parts(env: ResolverEnv, fetcher: F, builder: B) -> Self {
        Self {
            env,
            fetcher,
            builder,
        }
    }

    pub fn env(&self) -> &ResolverEnv {
        &self.env
    }

    /// Walks the tiers in order; always returns a location
    pub fn resolve(&self, options: ResolutionOptions) -> Resolution {
        let tiers: [(Tier, Probe<F, B>); 5] = [
            (Tier::Custom, Self::probe_custom),
            (Tier::Bundled, Self::probe_bundled),
            (Tier::Cached, Self::probe_cached),
            (Tier::Downloaded, Self::probe_download),
            (Tier::Built, Self::probe_build),
        ];

        let mut warnings = Vec::new();
        for (tier, probe) in tiers {
            if let Some(path) = probe(self, &options, &mut warnings) {
                info!("using {} from {}", path.display(), tier);
                return Resolution {
                    location: ExecutableLocation::Path(path),
                    tier,
                    warnings,
                };
            }
        }

        info!("falling back to {} on PATH", binary_name());
        Resolution {
            location: ExecutableLocation::Command(binary_name().to_string()),
            tier: Tier::Path,
            warnings,
        }
    }

    /// Explicit override, trusted without any existence check
    fn probe_custom(
        &self,
        options: &ResolutionOptions,
        _warnings: &mut Vec<ResolveWarning>,
    ) -> Option<PathBuf> {
        options
            .custom_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
    }

    fn probe_bundled(
        &self,
        _options: &ResolutionOptions,
        _warnings: &mut Vec<ResolveWarning>,
    ) -> Option<PathBuf> {
        let path = self.env.bundled_binary_path()?;
        debug!("looking for bundled binary at {}", path.display());
        path.is_file().then_some(path)
    }

    /// Also makes sure the cache directory exists for the tiers that write into it
    fn probe_cached(
        &self,
        _options: &ResolutionOptions,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Option<PathBuf> {
        let path = self.env.cached_binary_path();
        debug!("looking for cached binary at {}", path.display());
        if path.is_file() {
            return Some(path);
        }

        let cache_dir = self.env.cache_dir();
        // create_dir_all treats an existing directory as success, so racing callers are fine.
        if let Err(e) = fs::create_dir_all(&cache_dir) {
            warn!("could not create {}: {}", cache_dir.display(), e);
            warnings.push(ResolveWarning {
                tier: Tier::Cached,
                message: format!("could not create {}: {}", cache_dir.display(), e),
            });
        }
        None
    }

    fn probe_download(
        &self,
        options: &ResolutionOptions,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Option<PathBuf> {
        if !options.auto_download {
            return None;
        }

        let outcome = release_archive_url(
            &self.env.release_base_url,
            &options.release_version,
            &self.env.platform,
        )
        .and_then(|url| {
            info!("downloading formatter from {}", url);
            self.fetcher.fetch_and_extract(&url, &self.env.cache_dir())
        });

        if let Err(e) = outcome {
            warn!("download failed: {}", e);
            warnings.push(ResolveWarning {
                tier: Tier::Downloaded,
                message: e.to_string(),
            });
            return None;
        }

        let path = self.env.cached_binary_path();
        if path.is_file() {
            return Some(path);
        }

        warn!("release archive did not contain {}", binary_name());
        warnings.push(ResolveWarning {
            tier: Tier::Downloaded,
            message: format!("release archive did not contain {}", binary_name()),
        });
        None
    }

    fn probe_build(
        &self,
        options: &ResolutionOptions,
        warnings: &mut Vec<ResolveWarning>,
    ) -> Option<PathBuf> {
        if !options.auto_build {
            return None;
        }

        let Some(project) = self
            .env
            .workspace_root
            .as_deref()
            .and_then(build::source_project)
        else {
            debug!("no formatter source project in workspace");
            return None;
        };

        info!("building formatter from {}", project.display());
        if let Err(e) = self.builder.build(&project) {
            warn!("build failed: {}", e);
            warnings.push(ResolveWarning {
                tier: Tier::Built,
                message: e.to_string(),
            });
            return None;
        }

        let found = [build::release_output(&project), build::debug_output(&project)]
            .into_iter()
            .find(|candidate| candidate.is_file());
        if found.is_none() {
            warn!("build succeeded but produced no {}", binary_name());
            warnings.push(ResolveWarning {
                tier: Tier::Built,
                message: format!("build succeeded but produced no {}", binary_name()),
            });
        }
        found
    }
}
