//! Frame pack / unpack
//!
//! Frame format (no length prefix, no delimiter):
//! - source_id (u16 BE)
//! - schema_hash (u64 BE)
//! - unix_timestamp_ns (i64 BE)
//! - declared fields, in table order
//!
//! Per-field encoding:
//! - integers: big-endian two's-complement in their declared width
//! - floats: little-endian IEEE-754, placed verbatim. This is a wire
//!   compatibility constraint with deployed producers and consumers and must
//!   not be "fixed" to big-endian.
//! - boolean: 0x00 / 0x01 (any non-zero byte decodes as true)
//! - string: UTF-8, right-padded with 0x00 to 64 bytes, at most 63 bytes of
//!   content; trailing 0x00 bytes stripped on decode

use chrono::Utc;
use serde_json::{Map, Value};

use crate::schema::{
    is_bookkeeping, FieldType, SchemaTable, MAX_STRING_BYTES, SCHEMA_HASH, SOURCE_ID,
    UNIX_TIMESTAMP_NS,
};

use super::errors::{CodecError, CodecResult};
use super::layout::{FieldLayout, Layout};
use super::value::{FieldValue, Record};

/// Encoder / decoder for one schema table.
///
/// The layout and version identifier are computed once in `new` and never
/// change afterwards, so a `Codec` can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Codec {
    table: SchemaTable,
    layout: Layout,
}

impl Codec {
    /// Wraps a table, computing its layout and version identifier.
    pub fn new(table: SchemaTable) -> Self {
        let layout = Layout::compute(&table);
        Self { table, layout }
    }

    pub fn table(&self) -> &SchemaTable {
        &self.table
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Exact length of every frame this codec produces or accepts
    pub fn frame_length(&self) -> usize {
        self.layout.frame_length()
    }

    pub fn version_id(&self) -> u64 {
        self.layout.version_id()
    }

    /// Packs values into a frame stamped with the current wall-clock time.
    pub fn pack(&self, values: &Record) -> CodecResult<Vec<u8>> {
        self.pack_at(values, now_ns())
    }

    /// Packs values into a frame with an explicit timestamp.
    ///
    /// Bookkeeping fields in `values` are ignored: `source_id` is written as
    /// 0, `schema_hash` as the version identifier, `unix_timestamp_ns` as
    /// `timestamp_ns`.
    ///
    /// # Errors
    ///
    /// - `MissingField` if a declared field has no value
    /// - `UnknownField` if `values` names a field outside the table
    /// - `TypeMismatch` if a value's type differs from the field's
    /// - `StringTooLong` if a string exceeds 63 UTF-8 bytes
    ///
    /// Nothing is returned unless the whole frame encodes.
    pub fn pack_at(&self, values: &Record, timestamp_ns: i64) -> CodecResult<Vec<u8>> {
        for decl in self.table.declared() {
            if !values.contains(&decl.name) {
                return Err(CodecError::MissingField(decl.name.clone()));
            }
        }
        if let Some(unknown) = values.names().find(|name| !self.table.contains(name)) {
            return Err(CodecError::UnknownField(unknown.to_string()));
        }

        let mut frame = vec![0u8; self.frame_length()];
        for placed in self.layout.fields() {
            let slot = &mut frame[placed.range()];
            match placed.name.as_str() {
                SOURCE_ID => slot.copy_from_slice(&0u16.to_be_bytes()),
                SCHEMA_HASH => slot.copy_from_slice(&self.version_id().to_be_bytes()),
                UNIX_TIMESTAMP_NS => slot.copy_from_slice(&timestamp_ns.to_be_bytes()),
                name => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| CodecError::MissingField(name.to_string()))?;
                    encode_field(placed, value, slot)?;
                }
            }
        }

        Ok(frame)
    }

    /// Packs a JSON object, converting each value to its field's type first.
    ///
    /// Integer fields take JSON integers within the declared width, float
    /// fields any JSON number, boolean fields JSON booleans and string fields
    /// JSON strings. Bookkeeping keys are ignored as in `pack`.
    pub fn pack_json(&self, values: &Map<String, Value>) -> CodecResult<Vec<u8>> {
        let missing = self
            .table
            .declared()
            .iter()
            .find(|decl| !values.contains_key(&decl.name));
        if let Some(decl) = missing {
            return Err(CodecError::MissingField(decl.name.clone()));
        }

        let mut record = Record::new();
        for (name, raw) in values {
            if is_bookkeeping(name) {
                continue;
            }
            let decl = self
                .table
                .field(name)
                .ok_or_else(|| CodecError::UnknownField(name.clone()))?;
            record.insert(name.clone(), value_from_json(name, decl.field_type, raw)?);
        }
        self.pack(&record)
    }

    /// Decodes a frame into all fields, bookkeeping included, in table order.
    ///
    /// # Errors
    ///
    /// - `SizeMismatch` if `frame` is not exactly `frame_length()` bytes;
    ///   checked before anything is decoded
    /// - `InvalidUtf8` if a string slot is not valid UTF-8
    /// - `VersionMismatch` if the decoded `schema_hash` differs from
    ///   `version_id()`; checked only after a full decode
    pub fn unpack(&self, frame: &[u8]) -> CodecResult<Record> {
        if frame.len() != self.frame_length() {
            return Err(CodecError::SizeMismatch {
                expected: self.frame_length(),
                actual: frame.len(),
            });
        }

        let mut record = Record::new();
        for placed in self.layout.fields() {
            let value = decode_field(placed, &frame[placed.range()])?;
            record.insert(placed.name.clone(), value);
        }

        let hash = record
            .get(SCHEMA_HASH)
            .and_then(FieldValue::as_u64)
            .unwrap_or_default();
        if hash != self.version_id() {
            return Err(CodecError::VersionMismatch {
                expected: self.version_id(),
                actual: hash,
            });
        }

        Ok(record)
    }
}

/// Builds the codec for a table; same as `Codec::new`
pub fn build_codec(table: SchemaTable) -> Codec {
    Codec::new(table)
}

/// Current wall-clock time in nanoseconds since the unix epoch
fn now_ns() -> i64 {
    // Out of range only after the year 2262.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

fn encode_field(placed: &FieldLayout, value: &FieldValue, slot: &mut [u8]) -> CodecResult<()> {
    match (placed.field_type, value) {
        (FieldType::U8, FieldValue::U8(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::U16, FieldValue::U16(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::U32, FieldValue::U32(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::U64, FieldValue::U64(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::I8, FieldValue::I8(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::I16, FieldValue::I16(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::I32, FieldValue::I32(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::I64, FieldValue::I64(v)) => slot.copy_from_slice(&v.to_be_bytes()),
        (FieldType::F32, FieldValue::F32(v)) => slot.copy_from_slice(&v.to_le_bytes()),
        (FieldType::F64, FieldValue::F64(v)) => slot.copy_from_slice(&v.to_le_bytes()),
        (FieldType::Boolean, FieldValue::Bool(v)) => slot[0] = u8::from(*v),
        (FieldType::String, FieldValue::Str(v)) => {
            let bytes = v.as_bytes();
            if bytes.len() > MAX_STRING_BYTES {
                return Err(CodecError::StringTooLong {
                    field: placed.name.clone(),
                    len: bytes.len(),
                    max: MAX_STRING_BYTES,
                });
            }
            // The rest of the slot is already zeroed.
            slot[..bytes.len()].copy_from_slice(bytes);
        }
        (expected, other) => {
            return Err(CodecError::TypeMismatch {
                field: placed.name.clone(),
                expected,
                actual: other.field_type().tag().to_string(),
            })
        }
    }
    Ok(())
}

fn decode_field(placed: &FieldLayout, slot: &[u8]) -> CodecResult<FieldValue> {
    let value = match placed.field_type {
        FieldType::U8 => FieldValue::U8(u8::from_be_bytes(fixed(slot))),
        FieldType::U16 => FieldValue::U16(u16::from_be_bytes(fixed(slot))),
        FieldType::U32 => FieldValue::U32(u32::from_be_bytes(fixed(slot))),
        FieldType::U64 => FieldValue::U64(u64::from_be_bytes(fixed(slot))),
        FieldType::I8 => FieldValue::I8(i8::from_be_bytes(fixed(slot))),
        FieldType::I16 => FieldValue::I16(i16::from_be_bytes(fixed(slot))),
        FieldType::I32 => FieldValue::I32(i32::from_be_bytes(fixed(slot))),
        FieldType::I64 => FieldValue::I64(i64::from_be_bytes(fixed(slot))),
        FieldType::F32 => FieldValue::F32(f32::from_le_bytes(fixed(slot))),
        FieldType::F64 => FieldValue::F64(f64::from_le_bytes(fixed(slot))),
        FieldType::Boolean => FieldValue::Bool(slot[0] != 0),
        FieldType::String => {
            let text = std::str::from_utf8(slot).map_err(|e| CodecError::InvalidUtf8 {
                field: placed.name.clone(),
                reason: e.to_string(),
            })?;
            FieldValue::Str(text.trim_end_matches('\0').to_string())
        }
    };
    Ok(value)
}

/// Copies a slot into a fixed-size array. Slot widths come from the layout,
/// so the lengths always agree.
fn fixed<const N: usize>(slot: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(slot);
    out
}

/// Converts a JSON value to the declared type of a field.
fn value_from_json(field: &str, field_type: FieldType, raw: &Value) -> CodecResult<FieldValue> {
    let mismatch = || CodecError::TypeMismatch {
        field: field.to_string(),
        expected: field_type,
        actual: json_kind(raw).to_string(),
    };
    let out_of_range = || CodecError::ValueOutOfRange {
        field: field.to_string(),
        field_type,
        value: raw.to_string(),
    };

    match field_type {
        ty if ty.is_integer() => {
            let n = raw.as_number().ok_or_else(mismatch)?;
            let wide: i128 = if let Some(v) = n.as_i64() {
                v as i128
            } else if let Some(v) = n.as_u64() {
                v as i128
            } else {
                return Err(mismatch());
            };
            integer_value(ty, wide).ok_or_else(out_of_range)
        }
        FieldType::F32 => {
            let wide = raw.as_f64().ok_or_else(mismatch)?;
            float32_value(wide).map(FieldValue::F32).ok_or_else(out_of_range)
        }
        FieldType::F64 => raw.as_f64().map(FieldValue::F64).ok_or_else(mismatch),
        FieldType::Boolean => raw.as_bool().map(FieldValue::Bool).ok_or_else(mismatch),
        FieldType::String => raw
            .as_str()
            .map(|s| FieldValue::Str(s.to_string()))
            .ok_or_else(mismatch),
        _ => Err(mismatch()),
    }
}

/// Narrows an f64 to f32, None when a finite value would overflow to infinity.
pub(crate) fn float32_value(wide: f64) -> Option<f32> {
    let narrow = wide as f32;
    if wide.is_finite() && narrow.is_infinite() {
        return None;
    }
    Some(narrow)
}

/// Narrows a wide integer to the given integer type, None if it does not fit.
pub(crate) fn integer_value(field_type: FieldType, wide: i128) -> Option<FieldValue> {
    let value = match field_type {
        FieldType::U8 => FieldValue::U8(u8::try_from(wide).ok()?),
        FieldType::U16 => FieldValue::U16(u16::try_from(wide).ok()?),
        FieldType::U32 => FieldValue::U32(u32::try_from(wide).ok()?),
        FieldType::U64 => FieldValue::U64(u64::try_from(wide).ok()?),
        FieldType::I8 => FieldValue::I8(i8::try_from(wide).ok()?),
        FieldType::I16 => FieldValue::I16(i16::try_from(wide).ok()?),
        FieldType::I32 => FieldValue::I32(i32::try_from(wide).ok()?),
        FieldType::I64 => FieldValue::I64(i64::try_from(wide).ok()?),
        _ => return None,
    };
    Some(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
