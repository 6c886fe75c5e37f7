//! Format command - run the formatter over a script

use super::read_document;
use crate::context::Context;
use crate::output::print_raw;
use anyhow::{Context as _, Result};
use aspensqlplus_tool::FormatOptions;
use aspensqlplus_tool::exec::format_document;
use similar::{ChangeTag, TextDiff};
use std::path::Path;
use std::process::ExitCode;
use tracing::debug;

/// Execute `aspensqlplus format`
pub fn run(
    file: Option<&Path>,
    write: bool,
    diff: bool,
    config: Option<&Path>,
) -> Result<ExitCode> {
    let ctx = Context::new(config)?;
    let input = read_document(file)?;

    let resolution = ctx.resolve();
    let options = FormatOptions::from(&ctx.settings.format);
    let formatted = format_document(&resolution.location, &options, &input)?;

    match (write, file) {
        (true, Some(path)) => {
            if formatted == input {
                debug!("{} already formatted", path.display());
            } else {
                std::fs::write(path, &formatted)
                    .with_context(|| format!("Failed to write file {}", path.display()))?;
            }
        }
        _ if diff => print_raw(&render_diff(&input, &formatted))?,
        _ => print_raw(&formatted)?,
    }

    Ok(ExitCode::SUCCESS)
}

/// Line diff with `-`, `+` and ` ` prefixes
pub fn render_diff(old: &str, new: &str) -> String {
    let mut output = String::new();
    for change in TextDiff::from_lines(old, new).iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        output.push_str(sign);
        output.push_str(change.value());
        if change.missing_newline() {
            output.push('\n');
        }
    }
    output
}
