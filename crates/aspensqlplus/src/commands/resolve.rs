//! Resolve command - show which formatter executable is used

use crate::context::Context;
use crate::output::print_json;
use anyhow::Result;
use aspensqlplus_tool::Resolution;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    platform: String,
    #[serde(flatten)]
    resolution: &'a Resolution,
}

/// Execute `aspensqlplus resolve`
pub fn run(json: bool, config: Option<&Path>) -> Result<ExitCode> {
    let ctx = Context::new(config)?;
    let resolution = ctx.resolve();

    if json {
        print_json(&ResolveOutput {
            platform: ctx.env.platform.to_string(),
            resolution: &resolution,
        })?;
    } else {
        println!("Executable: {}", resolution.location);
        println!("Source:     {}", resolution.tier);
        println!("Platform:   {}", ctx.env.platform);
        for warning in &resolution.warnings {
            println!("Warning:    {}", warning);
        }
    }

    Ok(ExitCode::SUCCESS)
}
