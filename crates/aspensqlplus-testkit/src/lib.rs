//! Test utilities for aspensqlplus
//!
//! This crate provides shared testing utilities used across the aspensqlplus workspace.

use std::path::{Path, PathBuf};

pub mod env;
pub mod fixtures;
pub mod mock;

pub use env::{ENV_LOCK, IsolatedEnv, with_isolated_env};
pub use mock::{get_shared_mock_server, shared_mock_url};

/// Report the fake formatter prints in check mode
pub const FAKE_DIAGNOSTICS: &str = "\
2:7:17: warning: Unused variable 'unused_var' [unused-variable]
4:7:8: error: Variable 'i' has already been declared [duplicate-variable]
";

/// Writes an executable `/bin/sh` script named `name` into `dir`
///
/// `body` is everything after the shebang line.
///
/// # Panics
///
/// Panics if the file cannot be written or made executable.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("Failed to write script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
    }

    path
}

/// Shell body emulating the formatter
///
/// - `--diagnostics`: prints [`FAKE_DIAGNOSTICS`] on stderr and exits 1
/// - anything else: echoes stdin uppercased, so formatting is observable
pub fn fake_formatter_body() -> String {
    format!(
        "if [ \"$1\" = \"--diagnostics\" ]; then\n  cat > /dev/null\n  cat >&2 <<'EOF'\n{}EOF\n  exit 1\nfi\ntr 'a-z' 'A-Z'\n",
        FAKE_DIAGNOSTICS
    )
}

/// Writes a fake formatter (see [`fake_formatter_body`]) named `name` into `dir`
pub fn fake_formatter(dir: &Path, name: &str) -> PathBuf {
    write_script(dir, name, &fake_formatter_body())
}

/// Writes a formatter that rejects every document with `message` and exit code 2
pub fn failing_formatter(dir: &Path, name: &str, message: &str) -> PathBuf {
    write_script(
        dir,
        name,
        &format!("cat > /dev/null\necho '{}' >&2\nexit 2\n", message),
    )
}
