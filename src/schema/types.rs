//! Schema type definitions
//!
//! Supported field types (fixed registry):
//! - u8 / u16 / u32 / u64: unsigned, big-endian
//! - i8 / i16 / i32 / i64: signed two's-complement, big-endian
//! - f32 / f64: IEEE-754, little-endian in place
//! - boolean: one byte, 0x00 / 0x01
//! - string: fixed 64-byte slot, UTF-8, null padded

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of a string slot on the wire.
pub const STRING_SLOT_SIZE: usize = 64;

/// Longest string payload that fits a slot while leaving room for a terminator.
pub const MAX_STRING_BYTES: usize = STRING_SLOT_SIZE - 1;

/// Names of the bookkeeping fields, in wire order.
pub const SOURCE_ID: &str = "source_id";
pub const SCHEMA_HASH: &str = "schema_hash";
pub const UNIX_TIMESTAMP_NS: &str = "unix_timestamp_ns";

/// Number of implicit fields prepended to every table.
pub const BOOKKEEPING_FIELDS: usize = 3;

/// Field type tags from the fixed registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Boolean,
    String,
}

impl FieldType {
    /// Every registered type, in registry order.
    pub const ALL: [FieldType; 12] = [
        FieldType::U8,
        FieldType::U16,
        FieldType::U32,
        FieldType::U64,
        FieldType::I8,
        FieldType::I16,
        FieldType::I32,
        FieldType::I64,
        FieldType::F32,
        FieldType::F64,
        FieldType::Boolean,
        FieldType::String,
    ];

    /// Looks up a type by its tag, returns None for unregistered tags
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.tag() == tag)
    }

    /// Returns the tag as written in schema documents.
    ///
    /// The tag is also part of the version identifier input, so it must
    /// never change for an existing type.
    pub fn tag(self) -> &'static str {
        match self {
            FieldType::U8 => "u8",
            FieldType::U16 => "u16",
            FieldType::U32 => "u32",
            FieldType::U64 => "u64",
            FieldType::I8 => "i8",
            FieldType::I16 => "i16",
            FieldType::I32 => "i32",
            FieldType::I64 => "i64",
            FieldType::F32 => "f32",
            FieldType::F64 => "f64",
            FieldType::Boolean => "boolean",
            FieldType::String => "string",
        }
    }

    /// Returns the encoded width in bytes
    pub fn width(self) -> usize {
        match self {
            FieldType::U8 | FieldType::I8 | FieldType::Boolean => 1,
            FieldType::U16 | FieldType::I16 => 2,
            FieldType::U32 | FieldType::I32 | FieldType::F32 => 4,
            FieldType::U64 | FieldType::I64 | FieldType::F64 => 8,
            FieldType::String => STRING_SLOT_SIZE,
        }
    }

    /// Returns the C++ member type used by the header generator
    pub fn cpp_type(self) -> &'static str {
        match self {
            FieldType::U8 => "std::uint8_t",
            FieldType::U16 => "std::uint16_t",
            FieldType::U32 => "std::uint32_t",
            FieldType::U64 => "std::uint64_t",
            FieldType::I8 => "std::int8_t",
            FieldType::I16 => "std::int16_t",
            FieldType::I32 => "std::int32_t",
            FieldType::I64 => "std::int64_t",
            FieldType::F32 => "float",
            FieldType::F64 => "double",
            FieldType::Boolean => "bool",
            FieldType::String => "std::array<char, STRING_BUFFER_SIZE>",
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FieldType::U8
                | FieldType::U16
                | FieldType::U32
                | FieldType::U64
                | FieldType::I8
                | FieldType::I16
                | FieldType::I32
                | FieldType::I64
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, FieldType::F32 | FieldType::F64)
    }

    /// Integer or floating point
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Inclusive integer range representable by this type, None for non-integers
    pub fn integer_bounds(self) -> Option<(i128, i128)> {
        match self {
            FieldType::U8 => Some((0, u8::MAX as i128)),
            FieldType::U16 => Some((0, u16::MAX as i128)),
            FieldType::U32 => Some((0, u32::MAX as i128)),
            FieldType::U64 => Some((0, u64::MAX as i128)),
            FieldType::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            FieldType::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            FieldType::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            FieldType::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single field declaration
///
/// Only `name` and `field_type` are wire-relevant. Everything else is
/// carried for front ends, validation and code generation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Unique name within the table
    pub name: String,
    /// Free text description
    pub desc: String,
    /// Field data type
    pub field_type: FieldType,
    /// Declared default, as written in the document
    pub default: Option<serde_json::Value>,
    /// Inclusive lower bound (numeric types)
    pub min: Option<f64>,
    /// Inclusive upper bound (numeric types)
    pub max: Option<f64>,
    /// Allowed literal values (string types)
    pub options: Option<Vec<String>>,
    /// Boolean field that must not be enabled together with this one
    pub mutex_with: Option<String>,
    /// Display unit
    pub unit: Option<String>,
}

impl FieldDecl {
    /// Create a declaration with no optional attributes
    pub fn new(name: impl Into<String>, desc: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            desc: desc.into(),
            field_type,
            default: None,
            min: None,
            max: None,
            options: None,
            mutex_with: None,
            unit: None,
        }
    }

    /// Renders the declaration back into document shape
    pub fn to_document(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        obj.insert("type".into(), self.field_type.tag().into());
        obj.insert("desc".into(), self.desc.clone().into());
        if let Some(default) = &self.default {
            obj.insert("default".into(), default.clone());
        }
        if let Some(min) = self.min {
            obj.insert("min".into(), min.into());
        }
        if let Some(max) = self.max {
            obj.insert("max".into(), max.into());
        }
        if let Some(options) = &self.options {
            obj.insert("options".into(), options.clone().into());
        }
        if let Some(partner) = &self.mutex_with {
            obj.insert("mutex_with".into(), partner.clone().into());
        }
        if let Some(unit) = &self.unit {
            obj.insert("unit".into(), unit.clone().into());
        }
        serde_json::Value::Object(obj)
    }
}

/// Ordered, immutable field table: bookkeeping fields then declared fields
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaTable {
    fields: Vec<FieldDecl>,
}

impl SchemaTable {
    /// Creates a table from declared fields, prepending the bookkeeping fields.
    ///
    /// Name checks are the builder's job; this only fixes the order.
    pub(crate) fn from_declared(declared: Vec<FieldDecl>) -> Self {
        let mut fields = Vec::with_capacity(BOOKKEEPING_FIELDS + declared.len());
        fields.push(FieldDecl::new(
            SOURCE_ID,
            "id of where the data comes from",
            FieldType::U16,
        ));
        fields.push(FieldDecl::new(
            SCHEMA_HASH,
            "hash of the schema used to ensure compatibility",
            FieldType::U64,
        ));
        fields.push(FieldDecl::new(
            UNIX_TIMESTAMP_NS,
            "timestamp that counts the amount of time (in nanoseconds) since the unix epoch",
            FieldType::I64,
        ));
        fields.extend(declared);
        Self { fields }
    }

    /// All fields in wire order, bookkeeping first
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Caller-declared fields only
    pub fn declared(&self) -> &[FieldDecl] {
        &self.fields[BOOKKEEPING_FIELDS..]
    }

    /// Finds a field by name (bookkeeping included)
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Number of fields including bookkeeping
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// A table is never empty: the bookkeeping fields are always present.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Renders the declared fields back into document shape
    pub fn to_document(&self) -> serde_json::Value {
        let mut obj = serde_json::Map::new();
        for decl in self.declared() {
            obj.insert(decl.name.clone(), decl.to_document());
        }
        serde_json::Value::Object(obj)
    }
}

/// Returns true for the three implicit field names
pub fn is_bookkeeping(name: &str) -> bool {
    matches!(name, SOURCE_ID | SCHEMA_HASH | UNIX_TIMESTAMP_NS)
}
