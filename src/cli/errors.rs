//! CLI-specific error types
//!
//! Every CLI error ends the process with exit code 1. Library errors keep
//! their own `SHAREMAP_*` code when converted.

use std::fmt;
use std::io;

use crate::codec::CodecError;
use crate::http_server::ServerError;
use crate::schema::SchemaError;
use crate::transport::TransportError;

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: &'static str,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Input file or argument error
    pub fn input_error(msg: impl Into<String>) -> Self {
        Self::new("SHAREMAP_CLI_INPUT_ERROR", msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new("SHAREMAP_CLI_IO_ERROR", msg)
    }

    /// Runtime startup failure
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new("SHAREMAP_CLI_BOOT_FAILED", msg)
    }

    /// Get the error code string
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::input_error(format!("JSON error: {}", e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<CodecError> for CliError {
    fn from(e: CodecError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<TransportError> for CliError {
    fn from(e: TransportError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

impl From<ServerError> for CliError {
    fn from(e: ServerError) -> Self {
        Self::new(e.code(), e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
