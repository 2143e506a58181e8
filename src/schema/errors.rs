//! Schema error types
//!
//! Error codes:
//! - SHAREMAP_UNKNOWN_TYPE
//! - SHAREMAP_MISSING_ATTRIBUTE
//! - SHAREMAP_INVALID_DECLARATION
//! - SHAREMAP_RESERVED_FIELD
//! - SHAREMAP_NOT_A_MAPPING
//! - SHAREMAP_MISSING_SECTION
//! - SHAREMAP_MALFORMED_SCHEMA
//!
//! Validation codes (advisory, never raised by the codec):
//! - SHAREMAP_FIELD_REQUIRED
//! - SHAREMAP_NOT_A_NUMBER
//! - SHAREMAP_OUT_OF_RANGE
//! - SHAREMAP_INVALID_OPTION
//! - SHAREMAP_NOT_A_STRING
//! - SHAREMAP_STRING_TOO_LONG
//! - SHAREMAP_MUTEX_VIOLATION

use thiserror::Error;

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while building a schema table from a document
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("field '{field}': unknown type '{type_tag}'")]
    UnknownType { field: String, type_tag: String },

    #[error("field '{field}': missing required attribute '{attribute}'")]
    MissingAttribute { field: String, attribute: &'static str },

    #[error("field '{field}': {reason}")]
    InvalidDeclaration { field: String, reason: String },

    #[error("field '{0}' collides with a bookkeeping field")]
    ReservedField(String),

    #[error("schema document must be a mapping of field name to declaration")]
    NotAMapping,

    #[error("schema section '{0}' not found")]
    MissingSection(String),

    #[error("malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownType { .. } => "SHAREMAP_UNKNOWN_TYPE",
            SchemaError::MissingAttribute { .. } => "SHAREMAP_MISSING_ATTRIBUTE",
            SchemaError::InvalidDeclaration { .. } => "SHAREMAP_INVALID_DECLARATION",
            SchemaError::ReservedField(_) => "SHAREMAP_RESERVED_FIELD",
            SchemaError::NotAMapping => "SHAREMAP_NOT_A_MAPPING",
            SchemaError::MissingSection(_) => "SHAREMAP_MISSING_SECTION",
            SchemaError::Malformed { .. } => "SHAREMAP_MALFORMED_SCHEMA",
        }
    }

    /// Create an error for an unreadable or unparsable schema file
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Advisory validation failures for candidate field values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field is required")]
    Required { field: String },

    #[error("Invalid numeric value")]
    NotANumber { field: String },

    #[error("Value must be >= {bound}")]
    BelowMin { field: String, value: f64, bound: f64 },

    #[error("Value must be <= {bound}")]
    AboveMax { field: String, value: f64, bound: f64 },

    #[error("Value must be one of: {}", options.join(", "))]
    InvalidOption { field: String, value: String, options: Vec<String> },

    #[error("Value must be a string")]
    NotAString { field: String },

    #[error("String too long (max {max} bytes, got {len})")]
    StringTooLong { field: String, len: usize, max: usize },

    #[error("'{first}' and '{second}' cannot both be enabled")]
    MutexViolation { first: String, second: String },
}

impl ValidationError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::Required { .. } => "SHAREMAP_FIELD_REQUIRED",
            ValidationError::NotANumber { .. } => "SHAREMAP_NOT_A_NUMBER",
            ValidationError::BelowMin { .. } | ValidationError::AboveMax { .. } => {
                "SHAREMAP_OUT_OF_RANGE"
            }
            ValidationError::InvalidOption { .. } => "SHAREMAP_INVALID_OPTION",
            ValidationError::NotAString { .. } => "SHAREMAP_NOT_A_STRING",
            ValidationError::StringTooLong { .. } => "SHAREMAP_STRING_TOO_LONG",
            ValidationError::MutexViolation { .. } => "SHAREMAP_MUTEX_VIOLATION",
        }
    }

    /// Returns the field the error is attached to.
    ///
    /// Mutex violations report the first field of the pair.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::NotANumber { field }
            | ValidationError::BelowMin { field, .. }
            | ValidationError::AboveMax { field, .. }
            | ValidationError::InvalidOption { field, .. }
            | ValidationError::NotAString { field }
            | ValidationError::StringTooLong { field, .. } => field,
            ValidationError::MutexViolation { first, .. } => first,
        }
    }

    /// True for range violations (either bound)
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, ValidationError::BelowMin { .. } | ValidationError::AboveMax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_codes() {
        let err = SchemaError::UnknownType {
            field: "x".into(),
            type_tag: "u128".into(),
        };
        assert_eq!(err.code(), "SHAREMAP_UNKNOWN_TYPE");
        assert_eq!(SchemaError::NotAMapping.code(), "SHAREMAP_NOT_A_MAPPING");
        assert_eq!(
            SchemaError::malformed("a.json", "bad").code(),
            "SHAREMAP_MALFORMED_SCHEMA"
        );
    }

    #[test]
    fn test_schema_error_display_names_field() {
        let err = SchemaError::MissingAttribute {
            field: "gain_db".into(),
            attribute: "desc",
        };
        let display = err.to_string();
        assert!(display.contains("gain_db"));
        assert!(display.contains("desc"));
    }

    #[test]
    fn test_validation_messages() {
        let err = ValidationError::BelowMin {
            field: "gain_db".into(),
            value: -20.0,
            bound: -10.0,
        };
        assert_eq!(err.to_string(), "Value must be >= -10");
        assert!(err.is_out_of_range());
        assert_eq!(err.code(), "SHAREMAP_OUT_OF_RANGE");

        let err = ValidationError::InvalidOption {
            field: "mode".into(),
            value: "8PSK".into(),
            options: vec!["BPSK".into(), "QPSK".into()],
        };
        assert_eq!(err.to_string(), "Value must be one of: BPSK, QPSK");
        assert_eq!(err.field(), "mode");
    }

    #[test]
    fn test_mutex_message() {
        let err = ValidationError::MutexViolation {
            first: "stx1_enable".into(),
            second: "stx2_enable".into(),
        };
        assert_eq!(err.to_string(), "'stx1_enable' and 'stx2_enable' cannot both be enabled");
        assert_eq!(err.field(), "stx1_enable");
    }
}
