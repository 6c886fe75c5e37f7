//! Parsing and filtering of the formatter's diagnostic report
//!
//! The report is line oriented:
//!
//! ```text
//! <line>:<column>:<endColumn>: <severity>: <message> [<code>]
//! ```
//!
//! Positions are 1-based on the wire and 0-based in [`DiagnosticRecord`].
//! Lines that do not follow the grammar are skipped, so new kinds of output from
//! a newer formatter never break older callers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use aspensqlplus_core::DiagnosticsConfig;
use regex::Regex;
use serde::Serialize;

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+):([0-9]+):([0-9]+): (error|warning|info): (.+?) \[([^\]]+)\]$")
        .unwrap_or_else(|e| panic!("diagnostic line pattern is invalid: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(()),
        }
    }
}

/// One finding, with 0-based positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    pub line_index: usize,
    pub start_column: usize,
    pub end_column: usize,
    pub severity: Severity,
    pub message: String,
    pub code: String,
}

/// Which diagnostic codes are shown; codes it does not know about are always shown
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPolicy {
    categories: BTreeMap<String, bool>,
}

impl FilterPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, code: impl Into<String>, enabled: bool) -> Self {
        self.categories.insert(code.into(), enabled);
        self
    }

    pub fn is_enabled(&self, code: &str) -> bool {
        self.categories.get(code).copied().unwrap_or(true)
    }
}

impl From<&DiagnosticsConfig> for FilterPolicy {
    fn from(config: &DiagnosticsConfig) -> Self {
        Self {
            categories: config.categories.clone(),
        }
    }
}

/// Parses a raw report; never fails, non-matching lines are dropped
pub fn parse(raw: &str) -> Vec<DiagnosticRecord> {
    raw.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<DiagnosticRecord> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }

    let caps = LINE_PATTERN.captures(line)?;
    let position = |i: usize| -> Option<usize> { caps[i].parse::<usize>().ok()?.checked_sub(1) };

    let line_index = position(1)?;
    let start_column = position(2)?;
    let end_column = position(3)?;
    if start_column > end_column {
        return None;
    }

    Some(DiagnosticRecord {
        line_index,
        start_column,
        end_column,
        severity: caps[4].parse().ok()?,
        message: caps[5].to_string(),
        code: caps[6].to_string(),
    })
}

/// Drops records whose code is disabled by `policy`
pub fn filter(records: Vec<DiagnosticRecord>, policy: &FilterPolicy) -> Vec<DiagnosticRecord> {
    records
        .into_iter()
        .filter(|record| policy.is_enabled(&record.code))
        .collect()
}

/// Writes records back in the wire format, one per line
pub fn render(records: &[DiagnosticRecord]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&format!(
            "{}:{}:{}: {}: {} [{}]\n",
            record.line_index + 1,
            record.start_column + 1,
            record.end_column + 1,
            record.severity,
            record.message,
            record.code
        ));
    }
    output
}
