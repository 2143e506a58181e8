//! HTTP server error types

use std::io;

use thiserror::Error;

use crate::schema::SchemaError;

/// Result type for server setup
pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid server config: {0}")]
    Config(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("server I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ServerError {
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Config(_) => "SHAREMAP_SERVER_CONFIG_ERROR",
            ServerError::Schema(e) => e.code(),
            ServerError::Io(_) => "SHAREMAP_SERVER_IO_ERROR",
        }
    }
}
