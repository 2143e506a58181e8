//! Transport error types

use std::io;

use thiserror::Error;

/// Result type for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid endpoint '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported endpoint scheme '{0}', expected udp")]
    UnsupportedScheme(String),

    #[error("frame of {len} bytes exceeds the largest datagram ({max} bytes)")]
    FrameTooLarge { len: usize, max: usize },

    #[error("short send: {sent} of {expected} bytes")]
    ShortSend { sent: usize, expected: usize },

    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    pub fn code(&self) -> &'static str {
        match self {
            TransportError::InvalidUrl { .. } => "SHAREMAP_INVALID_URL",
            TransportError::UnsupportedScheme(_) => "SHAREMAP_UNSUPPORTED_SCHEME",
            TransportError::FrameTooLarge { .. } => "SHAREMAP_FRAME_TOO_LARGE",
            TransportError::ShortSend { .. } => "SHAREMAP_SHORT_SEND",
            TransportError::Io(_) => "SHAREMAP_SOCKET_ERROR",
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl Into<String>) -> Self {
        TransportError::InvalidUrl {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
