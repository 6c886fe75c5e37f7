//! Check command - report diagnostics for a script

use super::read_document;
use crate::context::Context;
use crate::output::{print_json, print_raw};
use anyhow::Result;
use aspensqlplus_tool::diagnostics::{self, FilterPolicy};
use aspensqlplus_tool::exec::check_document;
use std::path::Path;
use std::process::ExitCode;

/// Execute `aspensqlplus check`
///
/// Exits with status 1 when any diagnostic survives the configured filter.
pub fn run(file: Option<&Path>, json: bool, config: Option<&Path>) -> Result<ExitCode> {
    let ctx = Context::new(config)?;
    let input = read_document(file)?;

    let resolution = ctx.resolve();
    let report = check_document(&resolution.location, &input)?;

    let policy = FilterPolicy::from(&ctx.settings.diagnostics);
    let records = diagnostics::filter(diagnostics::parse(&report), &policy);

    if json {
        print_json(&records)?;
    } else {
        print_raw(&diagnostics::render(&records))?;
    }

    Ok(if records.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
