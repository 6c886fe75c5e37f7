//! Running the formatter over stdin/stdout
//!
//! [`invoke`] only transports bytes: it feeds the document on stdin, collects both
//! output streams and reports the exit code. Whether that exit code means success
//! depends on the [`InvocationMode`] and is decided by [`classify`].

use std::fmt;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

use aspensqlplus_core::{AspenError, FormatConfig, Result};
use tracing::debug;

use crate::info::ExecutableLocation;

/// Flag asking the formatter for a diagnostic report instead of formatted text
pub const CHECK_FLAG: &str = "--diagnostics";

/// Result of one formatter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exit code, `-1` if the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

/// Which exit-code convention applies to a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// 0 is success, anything else is a failure
    Format,
    /// 0 (clean) and 1 (findings reported) are both normal outcomes
    Check,
}

impl fmt::Display for InvocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationMode::Format => write!(f, "format"),
            InvocationMode::Check => write!(f, "check"),
        }
    }
}

/// Formatting flags passed to the formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub line_width: usize,
    pub indent_width: u8,
    pub uppercase_keywords: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self::from(&FormatConfig::default())
    }
}

impl From<&FormatConfig> for FormatOptions {
    fn from(config: &FormatConfig) -> Self {
        Self {
            line_width: config.line_width,
            indent_width: config.indent_width,
            uppercase_keywords: config.uppercase_keywords,
        }
    }
}

pub fn format_args(options: &FormatOptions) -> Vec<String> {
    vec![
        "--line-width".to_string(),
        options.line_width.to_string(),
        "--indent".to_string(),
        options.indent_width.to_string(),
        "--uppercase-keywords".to_string(),
        options.uppercase_keywords.to_string(),
    ]
}

pub fn check_args() -> Vec<String> {
    vec![CHECK_FLAG.to_string()]
}

/// Spawns `executable`, writes `input` to its stdin, closes it and waits for exit
///
/// Resolves with the full result whatever the exit code was.
///
/// # Errors
///
/// `SpawnError` if the executable cannot be started, `IoError` if waiting on it
/// or reading its output fails.
pub fn invoke(
    executable: &ExecutableLocation,
    args: &[String],
    input: &str,
) -> Result<InvocationResult> {
    let program = executable.to_string();
    debug!("invoking {} {:?}", program, args);

    let start = Instant::now();
    let mut child = Command::new(executable.program())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| AspenError::SpawnError {
            program: program.clone(),
            reason: e.to_string(),
        })?;

    // Both readers run before stdin is written so a chatty child cannot fill a pipe and stall.
    let stdout_handle = child
        .stdout
        .take()
        .map(|pipe| thread::spawn(move || read_pipe_to_string(pipe)));
    let stderr_handle = child
        .stderr
        .take()
        .map(|pipe| thread::spawn(move || read_pipe_to_string(pipe)));

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(input.as_bytes()) {
            Ok(()) => {}
            // The tool stopped reading early; its exit status tells the rest.
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("{} closed stdin before reading all input", program);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                let _ = join_reader(stdout_handle);
                let _ = join_reader(stderr_handle);
                return Err(AspenError::io(format!("write to stdin of {}", program), e));
            }
        }
        // Dropping stdin closes the pipe and signals end of input.
    }

    let status = child
        .wait()
        .map_err(|e| AspenError::io(format!("wait for {}", program), e))?;

    let stdout = join_reader(stdout_handle)
        .map_err(|e| AspenError::io(format!("read stdout of {}", program), e))?;
    let stderr = join_reader(stderr_handle)
        .map_err(|e| AspenError::io(format!("read stderr of {}", program), e))?;

    let exit_code = status.code().unwrap_or(-1);
    debug!("{} exited with code {}", program, exit_code);

    Ok(InvocationResult {
        exit_code,
        stdout,
        stderr,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Applies the exit-code convention of `mode` to a finished run
///
/// - Format: exit 0 yields stdout
/// - Check: exit 0 or 1 yields the report, stderr if non-empty, else stdout
///
/// Any other outcome is a `ProtocolError` whose detail is stderr, else stdout,
/// else a generic no-output note. A stream holding only whitespace counts as empty.
pub fn classify(mode: InvocationMode, result: &InvocationResult) -> Result<String> {
    match (mode, result.exit_code) {
        (InvocationMode::Format, 0) => Ok(result.stdout.clone()),
        (InvocationMode::Check, 0 | 1) => Ok(preferred_stream(result).to_string()),
        (mode, exit_code) => {
            let detail = match preferred_stream(result).trim() {
                "" => "no output".to_string(),
                text => text.to_string(),
            };
            Err(AspenError::ProtocolError {
                mode: mode.to_string(),
                exit_code,
                detail,
            })
        }
    }
}

/// Formats `text`, returning the formatter's output
pub fn format_document(
    executable: &ExecutableLocation,
    options: &FormatOptions,
    text: &str,
) -> Result<String> {
    let result = invoke(executable, &format_args(options), text)?;
    classify(InvocationMode::Format, &result)
}

/// Checks `text`, returning the raw diagnostic report
pub fn check_document(executable: &ExecutableLocation, text: &str) -> Result<String> {
    let result = invoke(executable, &check_args(), text)?;
    classify(InvocationMode::Check, &result)
}

fn preferred_stream(result: &InvocationResult) -> &str {
    if result.stderr.trim().is_empty() {
        &result.stdout
    } else {
        &result.stderr
    }
}

fn read_pipe_to_string<R: Read>(mut pipe: R) -> io::Result<String> {
    let mut buf = Vec::new();
    pipe.read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn join_reader(handle: Option<thread::JoinHandle<io::Result<String>>>) -> io::Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .unwrap_or_else(|_| Err(io::Error::other("output reader thread panicked"))),
        None => Ok(String::new()),
    }
}
