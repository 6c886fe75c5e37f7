use thiserror::Error;

#[derive(Error, Debug)]
pub enum AspenError {
    // Acquisition errors
    #[error("NETWORK_ERROR: failed to download {url}: {reason}")]
    NetworkError { url: String, reason: String },

    #[error("IO_ERROR: {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("BUILD_ERROR: {0}")]
    BuildError(String),

    // Invocation errors
    #[error("SPAWN_ERROR: could not start '{program}': {reason}")]
    SpawnError { program: String, reason: String },

    #[error("PROTOCOL_ERROR: {mode} exited with code {exit_code}: {detail}")]
    ProtocolError {
        mode: String,
        exit_code: i32,
        detail: String,
    },

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // Generic errors
    #[error("{0}")]
    Generic(String),
}

impl AspenError {
    /// Wraps an I/O error with a short description of what was being attempted
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        AspenError::IoError {
            operation: operation.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AspenError>;
