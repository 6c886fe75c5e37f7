//! Shared helpers for CLI integration tests

#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo_bin;
use aspensqlplus_testkit::{IsolatedEnv, fake_formatter};
use aspensqlplus_tool::PlatformTriple;
use aspensqlplus_tool::install::binary_name;
use std::fs;
use std::path::PathBuf;

/// Settings that keep resolution offline
pub const OFFLINE_SETTINGS: &str = r#"
[executable]
auto_build = false
auto_download = false
"#;

/// `aspensqlplus` running inside `isolated`'s workspace with its directories
pub fn aspen_cmd(isolated: &IsolatedEnv) -> Command {
    let mut cmd = Command::new(cargo_bin!(env!("CARGO_PKG_NAME")));
    cmd.current_dir(isolated.workspace_dir())
        .envs(isolated.vars())
        .env_remove("RUST_LOG")
        .env_remove("ASPENSQLPLUS_CONFIG");
    cmd
}

pub fn write_settings(isolated: &IsolatedEnv, contents: &str) -> PathBuf {
    let path = isolated.workspace_dir().join("aspensqlplus.toml");
    fs::write(&path, contents).expect("Failed to write settings");
    path
}

/// Installs the fake formatter where the resolver looks for a bundled binary
pub fn install_bundled_formatter(isolated: &IsolatedEnv) -> PathBuf {
    let dir = isolated
        .bundle_dir()
        .join("bin")
        .join(PlatformTriple::current().to_string());
    fs::create_dir_all(&dir).expect("Failed to create bundle dir");
    fake_formatter(&dir, binary_name())
}
