//! Doctor command - environment health check
//!
//! Only inspects the filesystem and PATH; it never downloads or builds.

use crate::context::{Context, resolver_env};
use crate::output::print_json;
use anyhow::Result;
use aspensqlplus_tool::build::source_project;
use aspensqlplus_tool::install::binary_name;
use chrono::Utc;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::process::ExitCode;

/// Doctor command JSON output schema
#[derive(Debug, Serialize, Deserialize)]
struct DoctorOutput {
    schema_version: String,
    platform: String,
    timestamp: String,
    checks: Vec<Check>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Check {
    id: String,
    name: String,
    status: CheckStatus,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl Check {
    fn new(id: &str, name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            status,
            message: message.into(),
            details: None,
        }
    }

    fn with_path(mut self, path: &Path) -> Self {
        self.details.get_or_insert_with(BTreeMap::new).insert(
            "path".to_string(),
            serde_json::Value::String(path.display().to_string()),
        );
        self
    }
}

/// Run environment health check
///
/// Always returns success; problems are reported in the checks, not the exit code.
pub fn run(json: bool, config: Option<&Path>) -> Result<ExitCode> {
    let current_dir = env::current_dir()?;
    let mut checks = Vec::new();

    // Settings problems are reported, then the remaining checks run on defaults.
    let env = match Context::new(config) {
        Ok(ctx) => {
            let message = match &ctx.settings_path {
                Some(path) => format!("{} is valid", path.display()),
                None => "no aspensqlplus.toml found, using defaults".to_string(),
            };
            checks.push(Check::new(
                "config_valid",
                "Configuration file",
                CheckStatus::Ok,
                message,
            ));

            let unknown = ctx.settings.diagnostics.unknown_categories();
            checks.push(if unknown.is_empty() {
                Check::new(
                    "diagnostic_categories",
                    "Diagnostic categories",
                    CheckStatus::Ok,
                    "all configured categories are known",
                )
            } else {
                Check::new(
                    "diagnostic_categories",
                    "Diagnostic categories",
                    CheckStatus::Warning,
                    format!("unknown categories: {}", unknown.join(", ")),
                )
            });
            Some(ctx.env)
        }
        Err(e) => {
            checks.push(Check::new(
                "config_valid",
                "Configuration file",
                CheckStatus::Error,
                format!("Failed to load config: {:#}", e),
            ));
            resolver_env(&current_dir).ok()
        }
    };

    let platform = match &env {
        Some(env) => env.platform.to_string(),
        None => aspensqlplus_tool::PlatformTriple::current().to_string(),
    };

    match &env {
        Some(env) => {
            checks.push(match env.bundled_binary_path() {
                Some(path) if path.is_file() => Check::new(
                    "bundled_binary",
                    "Bundled formatter",
                    CheckStatus::Ok,
                    "present",
                )
                .with_path(&path),
                Some(path) => Check::new(
                    "bundled_binary",
                    "Bundled formatter",
                    CheckStatus::Warning,
                    "not present",
                )
                .with_path(&path),
                None => Check::new(
                    "bundled_binary",
                    "Bundled formatter",
                    CheckStatus::Warning,
                    "no bundle directory",
                ),
            });

            let cached = env.cached_binary_path();
            checks.push(if cached.is_file() {
                Check::new("cached_binary", "Cached formatter", CheckStatus::Ok, "present")
                    .with_path(&cached)
            } else {
                Check::new(
                    "cached_binary",
                    "Cached formatter",
                    CheckStatus::Warning,
                    "not downloaded yet",
                )
                .with_path(&cached)
            });

            if let Some(project) = env.workspace_root.as_deref().and_then(source_project) {
                checks.push(
                    Check::new(
                        "source_project",
                        "Formatter sources",
                        CheckStatus::Ok,
                        "can be built from source",
                    )
                    .with_path(&project),
                );
            }
        }
        None => checks.push(Check::new(
            "storage_root",
            "Storage directory",
            CheckStatus::Error,
            "could not determine where to cache the formatter",
        )),
    }

    checks.push(match which::which(binary_name()) {
        Ok(path) => Check::new("path_binary", "Formatter on PATH", CheckStatus::Ok, "found")
            .with_path(&path),
        Err(_) => Check::new(
            "path_binary",
            "Formatter on PATH",
            CheckStatus::Warning,
            format!("{} not found on PATH", binary_name()),
        ),
    });

    let output = DoctorOutput {
        schema_version: "1.0".to_string(),
        platform,
        timestamp: Utc::now().to_rfc3339(),
        checks,
    };

    if json {
        print_json(&output)?;
    } else {
        print_human_readable(&output);
    }

    Ok(ExitCode::SUCCESS)
}

/// Print human-readable output
fn print_human_readable(output: &DoctorOutput) {
    println!("{}", "Environment Health Check".bold());
    println!();
    println!("Platform: {}", output.platform);
    println!();

    println!("{}", "Checks:".bold());
    for check in &output.checks {
        let status_str = match check.status {
            CheckStatus::Ok => "✓".green(),
            CheckStatus::Warning => "⚠".yellow(),
            CheckStatus::Error => "✗".red(),
        };

        println!("  {} {}: {}", status_str, check.name.bold(), check.message);

        if let Some(details) = &check.details {
            for (key, value) in details {
                println!("      {}: {}", key, value);
            }
        }
    }

    println!();
    println!("Timestamp: {}", output.timestamp);
}
