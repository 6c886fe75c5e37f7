//! Environment isolation utilities for testing
//!
//! The CLI reads its cache and bundle locations from environment variables.
//! [`IsolatedEnv`] gives each test its own set of directories, and
//! [`with_isolated_env`] points the process environment at them for tests that
//! call into the CLI code in-process.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Static mutex to serialize tests that modify environment variables
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

pub const CACHE_DIR_VAR: &str = "ASPENSQLPLUS_CACHE_DIR";
pub const BUNDLE_DIR_VAR: &str = "ASPENSQLPLUS_BUNDLE_DIR";
pub const RELEASE_BASE_URL_VAR: &str = "ASPENSQLPLUS_RELEASE_BASE_URL";

/// Throwaway cache, bundle and workspace directories
pub struct IsolatedEnv {
    root: TempDir,
}

impl IsolatedEnv {
    /// # Panics
    ///
    /// Panics if the directories cannot be created.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create isolated root");
        for dir in ["cache", "bundle", "workspace"] {
            std::fs::create_dir_all(root.path().join(dir))
                .expect("Failed to create isolated directory");
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.path().join("cache")
    }

    pub fn bundle_dir(&self) -> PathBuf {
        self.root.path().join("bundle")
    }

    pub fn workspace_dir(&self) -> PathBuf {
        self.root.path().join("workspace")
    }

    /// Environment a child process needs to stay inside these directories
    ///
    /// The release URL points at a port nothing listens on, so an accidental
    /// download fails fast instead of reaching the network.
    pub fn vars(&self) -> Vec<(&'static str, String)> {
        vec![
            (CACHE_DIR_VAR, self.cache_dir().to_string_lossy().into_owned()),
            (BUNDLE_DIR_VAR, self.bundle_dir().to_string_lossy().into_owned()),
            (RELEASE_BASE_URL_VAR, "http://127.0.0.1:9/releases".to_string()),
        ]
    }
}

impl Default for IsolatedEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs `f` with the process environment pointed at a fresh [`IsolatedEnv`]
///
/// Access is serialized through [`ENV_LOCK`] and the previous values are
/// restored afterwards.
///
/// # Examples
///
/// ```no_run
/// use aspensqlplus_testkit::with_isolated_env;
///
/// // Example test function (not executed in doctest)
/// fn test_cache_location() {
///     with_isolated_env(|env| {
///         let cache = std::env::var("ASPENSQLPLUS_CACHE_DIR").unwrap();
///         assert_eq!(cache, env.cache_dir().to_string_lossy());
///     });
/// }
/// ```
pub fn with_isolated_env<F, R>(f: F) -> R
where
    F: FnOnce(&IsolatedEnv) -> R,
{
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| {
        // The environment stays valid after a panic; the lock only serializes access.
        poisoned.into_inner()
    });

    let env = IsolatedEnv::new();
    let vars = env.vars();
    let originals: Vec<(&'static str, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (*key, std::env::var(key).ok()))
        .collect();

    // SAFETY: ENV_LOCK is held, so no other test modifies the environment concurrently.
    unsafe {
        for (key, value) in &vars {
            std::env::set_var(key, value);
        }
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| f(&env)));

    // SAFETY: ENV_LOCK is still held.
    unsafe {
        for (key, original) in originals {
            match original {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(payload) => std::panic::resume_unwind(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolated_env_creates_directories() {
        let env = IsolatedEnv::new();
        assert!(env.cache_dir().is_dir());
        assert!(env.bundle_dir().is_dir());
        assert!(env.workspace_dir().is_dir());
        assert!(env.cache_dir().starts_with(env.root()));
    }

    #[test]
    fn test_with_isolated_env_sets_and_restores() {
        let original = std::env::var(CACHE_DIR_VAR).ok();

        let seen = with_isolated_env(|env| {
            let cache = std::env::var(CACHE_DIR_VAR).unwrap();
            assert_eq!(cache, env.cache_dir().to_string_lossy());
            assert!(std::env::var(RELEASE_BASE_URL_VAR).unwrap().starts_with("http://127.0.0.1"));
            cache
        });

        assert!(!seen.is_empty());
        assert_eq!(std::env::var(CACHE_DIR_VAR).ok(), original);
    }

    #[test]
    fn test_with_isolated_env_serializes_access() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::thread;

        let inside = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let inside = Arc::clone(&inside);
                thread::spawn(move || {
                    with_isolated_env(|_env| {
                        let current = inside.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(std::time::Duration::from_millis(10));
                        assert_eq!(current, 0, "only one thread inside at a time");
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(inside.load(Ordering::SeqCst), 0);
    }
}
