//! Global context for CLI commands

use anyhow::{Context as _, Result};
use aspensqlplus_core::Settings;
use aspensqlplus_core::config::find_settings_file;
use aspensqlplus_core::paths::{self, BUNDLE_DIR_ENV, CACHE_DIR_ENV, RELEASE_BASE_URL_ENV};
use aspensqlplus_tool::install::default_release_base_url;
use aspensqlplus_tool::{BinaryResolver, Resolution, ResolutionOptions, ResolverEnv};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Settings and resolver locations shared by every command
pub struct Context {
    pub settings: Settings,
    /// File the settings came from, `None` when running on defaults
    pub settings_path: Option<PathBuf>,
    pub env: ResolverEnv,
}

impl Context {
    /// Loads settings (explicit path, else the nearest aspensqlplus.toml) and
    /// builds the resolver environment for the current directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The settings file cannot be read, parsed or validated
    /// - The storage root cannot be determined
    /// - `ASPENSQLPLUS_RELEASE_BASE_URL` is not a valid URL
    pub fn new(config: Option<&Path>) -> Result<Self> {
        let current_dir = env::current_dir()?;
        let (settings, settings_path) = load_settings(config, &current_dir)?;
        let env = resolver_env(&current_dir)?;

        Ok(Self {
            settings,
            settings_path,
            env,
        })
    }

    /// Runs the resolver with the configured options
    pub fn resolve(&self) -> Resolution {
        BinaryResolver::new(self.env.clone())
            .resolve(ResolutionOptions::from(&self.settings.executable))
    }
}

fn load_settings(config: Option<&Path>, start: &Path) -> Result<(Settings, Option<PathBuf>)> {
    let path = match config {
        Some(path) => Some(path.to_path_buf()),
        None => find_settings_file(start),
    };

    match path {
        Some(path) => {
            debug!("loading settings from {}", path.display());
            let settings = Settings::from_file(&path)?;
            Ok((settings, Some(path)))
        }
        None => Ok((Settings::default(), None)),
    }
}

/// Resolver environment from `ASPENSQLPLUS_*` variables and platform defaults
pub fn resolver_env(workspace_root: &Path) -> Result<ResolverEnv> {
    let storage_root = paths::storage_root_or(env::var(CACHE_DIR_ENV).ok().as_deref())?;

    let release_base_url = match env::var(RELEASE_BASE_URL_ENV) {
        Ok(value) if !value.trim().is_empty() => Url::parse(value.trim())
            .with_context(|| format!("{} is not a valid URL", RELEASE_BASE_URL_ENV))?,
        _ => default_release_base_url()?,
    };

    let executable = env::current_exe()?;
    let mut resolver_env = ResolverEnv::new(storage_root, release_base_url)
        .with_workspace_root(workspace_root);
    if let Some(bundle_root) =
        paths::bundle_root_or(env::var(BUNDLE_DIR_ENV).ok().as_deref(), &executable)
    {
        resolver_env = resolver_env.with_bundle_root(bundle_root);
    }

    Ok(resolver_env)
}
