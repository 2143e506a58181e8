//! Schema Model for sharemap
//!
//! Turns a declarative field mapping into an immutable, ordered field table.
//!
//! # Design Principles
//!
//! - Fixed type registry, unknown tags rejected at build time
//! - Bookkeeping fields always first, in fixed order
//! - Document order is table order
//! - No I/O at build time; files are read only by `SchemaDocument`
//! - Range / option / mutex rules are advisory and live in the validator

mod builder;
mod errors;
mod loader;
mod types;
mod validator;

pub use builder::build_schema;
pub use errors::{SchemaError, SchemaResult, ValidationError};
pub use loader::{SchemaDocument, SchemaFormat};
pub use types::{
    is_bookkeeping, FieldDecl, FieldType, SchemaTable, BOOKKEEPING_FIELDS, MAX_STRING_BYTES,
    SCHEMA_HASH, SOURCE_ID, STRING_SLOT_SIZE, UNIX_TIMESTAMP_NS,
};
pub use validator::{is_truthy, validate_record, SchemaValidator, ValidationReport};
