//! Codec error types
//!
//! Pack:
//! - SHAREMAP_MISSING_FIELD
//! - SHAREMAP_UNKNOWN_FIELD
//! - SHAREMAP_STRING_TOO_LONG
//! - SHAREMAP_TYPE_MISMATCH
//! - SHAREMAP_VALUE_OUT_OF_RANGE
//!
//! Unpack:
//! - SHAREMAP_SIZE_MISMATCH
//! - SHAREMAP_VERSION_MISMATCH
//! - SHAREMAP_INVALID_UTF8
//!
//! Every error is terminal for the call that raised it.

use thiserror::Error;

use crate::schema::FieldType;

/// Result type for pack / unpack
pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    #[error("sharemap missing field '{0}'")]
    MissingField(String),

    #[error("sharemap unrecognized field '{0}'")]
    UnknownField(String),

    #[error("field '{field}': string is {len} bytes, at most {max} fit")]
    StringTooLong { field: String, len: usize, max: usize },

    #[error("field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: String,
    },

    #[error("field '{field}': {value} does not fit in {field_type}")]
    ValueOutOfRange {
        field: String,
        field_type: FieldType,
        value: String,
    },

    #[error("incompatible sharemap: expected size {expected} bytes, but got size {actual} bytes")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("incompatible sharemap: expected hash {expected:#018x}, but got hash {actual:#018x}")]
    VersionMismatch { expected: u64, actual: u64 },

    #[error("field '{field}': invalid UTF-8 in string slot: {reason}")]
    InvalidUtf8 { field: String, reason: String },
}

impl CodecError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            CodecError::MissingField(_) => "SHAREMAP_MISSING_FIELD",
            CodecError::UnknownField(_) => "SHAREMAP_UNKNOWN_FIELD",
            CodecError::StringTooLong { .. } => "SHAREMAP_STRING_TOO_LONG",
            CodecError::TypeMismatch { .. } => "SHAREMAP_TYPE_MISMATCH",
            CodecError::ValueOutOfRange { .. } => "SHAREMAP_VALUE_OUT_OF_RANGE",
            CodecError::SizeMismatch { .. } => "SHAREMAP_SIZE_MISMATCH",
            CodecError::VersionMismatch { .. } => "SHAREMAP_VERSION_MISMATCH",
            CodecError::InvalidUtf8 { .. } => "SHAREMAP_INVALID_UTF8",
        }
    }

    /// True for errors raised while decoding a frame
    pub fn is_unpack_error(&self) -> bool {
        matches!(
            self,
            CodecError::SizeMismatch { .. }
                | CodecError::VersionMismatch { .. }
                | CodecError::InvalidUtf8 { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatch_messages_carry_both_sides() {
        let err = CodecError::SizeMismatch {
            expected: 22,
            actual: 21,
        };
        assert_eq!(
            err.to_string(),
            "incompatible sharemap: expected size 22 bytes, but got size 21 bytes"
        );

        let err = CodecError::VersionMismatch {
            expected: 0xa20b7ede39c02e9e,
            actual: 1,
        };
        let display = err.to_string();
        assert!(display.contains("0xa20b7ede39c02e9e"));
        assert!(display.contains("0x0000000000000001"));
        assert!(err.is_unpack_error());
    }

    #[test]
    fn test_codes() {
        assert_eq!(CodecError::MissingField("x".into()).code(), "SHAREMAP_MISSING_FIELD");
        assert_eq!(CodecError::UnknownField("x".into()).code(), "SHAREMAP_UNKNOWN_FIELD");
        assert!(!CodecError::UnknownField("x".into()).is_unpack_error());
    }
}
