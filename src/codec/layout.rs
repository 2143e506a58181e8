//! Layout & Hash Engine
//!
//! Projects a schema table onto a fixed byte layout and derives the 64-bit
//! version identifier.
//!
//! Version identifier:
//! - SHA-256 over `name ‖ type_tag` for each declared field, in table order
//! - bookkeeping fields are not part of the input
//! - identifier = first 8 digest bytes as a big-endian u64

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::schema::{FieldDecl, FieldType, SchemaTable};

/// Placement of one field inside a frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Byte offset from the start of the frame
    pub offset: usize,
    /// Encoded width in bytes
    pub width: usize,
}

impl FieldLayout {
    /// Byte range occupied by the field
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.width
    }
}

/// Fixed frame layout and version identifier for one schema table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    fields: Vec<FieldLayout>,
    frame_length: usize,
    version_id: u64,
}

impl Layout {
    /// Computes the layout for a table.
    pub fn compute(table: &SchemaTable) -> Self {
        let mut offset = 0;
        let fields = table
            .fields()
            .iter()
            .map(|decl| {
                let width = decl.field_type.width();
                let placed = FieldLayout {
                    name: decl.name.clone(),
                    field_type: decl.field_type,
                    offset,
                    width,
                };
                offset += width;
                placed
            })
            .collect();

        Self {
            fields,
            frame_length: offset,
            version_id: compute_version_id(table.declared()),
        }
    }

    /// Fields in wire order, bookkeeping first
    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    /// Total frame length in bytes
    pub fn frame_length(&self) -> usize {
        self.frame_length
    }

    pub fn version_id(&self) -> u64 {
        self.version_id
    }

    /// Finds a placed field by name
    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Computes the version identifier over declared fields.
///
/// Only names and type tags contribute; descriptions, defaults, bounds and
/// options do not.
pub fn compute_version_id(declared: &[FieldDecl]) -> u64 {
    let mut hasher = Sha256::new();
    for decl in declared {
        hasher.update(decl.name.as_bytes());
        hasher.update(decl.field_type.tag().as_bytes());
    }
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_schema;
    use serde_json::json;

    #[test]
    fn test_offsets_and_length() {
        let table = build_schema(&json!({
            "flag": { "type": "boolean", "desc": "flag" },
            "name": { "type": "string", "desc": "name" },
            "rate": { "type": "f64", "desc": "rate" }
        }))
        .unwrap();
        let layout = Layout::compute(&table);

        let offsets: Vec<(usize, usize)> = layout.fields().iter().map(|f| (f.offset, f.width)).collect();
        assert_eq!(
            offsets,
            vec![(0, 2), (2, 8), (10, 8), (18, 1), (19, 64), (83, 8)]
        );
        assert_eq!(layout.frame_length(), 91);
        assert_eq!(layout.field("name").unwrap().range(), 19..83);
    }

    #[test]
    fn test_empty_table_is_bookkeeping_only() {
        let table = build_schema(&json!({})).unwrap();
        let layout = Layout::compute(&table);
        assert_eq!(layout.frame_length(), 18);
        // SHA-256 of the empty input
        assert_eq!(layout.version_id(), 0xe3b0c44298fc1c14);
    }

    #[test]
    fn test_version_id_is_digest_prefix() {
        let decl = FieldDecl::new("a", "", FieldType::String);
        let mut hasher = Sha256::new();
        hasher.update(b"astring");
        let digest = hasher.finalize();
        let expected = u64::from_be_bytes(digest[..8].try_into().unwrap());
        assert_eq!(compute_version_id(&[decl]), expected);
    }

    #[test]
    fn test_version_id_ignores_metadata() {
        let a = build_schema(&json!({
            "gain_db": { "type": "f32", "desc": "Gain", "min": -10, "max": 20 }
        }))
        .unwrap();
        let b = build_schema(&json!({
            "gain_db": { "type": "f32", "desc": "Something else", "default": 3.0 }
        }))
        .unwrap();
        assert_eq!(Layout::compute(&a).version_id(), Layout::compute(&b).version_id());
    }

    #[test]
    fn test_version_id_tracks_name_type_order() {
        let base = build_schema(&json!({
            "a": { "type": "u8", "desc": "" },
            "b": { "type": "u16", "desc": "" }
        }))
        .unwrap();
        let renamed = build_schema(&json!({
            "a": { "type": "u8", "desc": "" },
            "c": { "type": "u16", "desc": "" }
        }))
        .unwrap();
        let retyped = build_schema(&json!({
            "a": { "type": "u8", "desc": "" },
            "b": { "type": "i16", "desc": "" }
        }))
        .unwrap();
        let reordered = build_schema(&json!({
            "b": { "type": "u16", "desc": "" },
            "a": { "type": "u8", "desc": "" }
        }))
        .unwrap();

        let id = Layout::compute(&base).version_id();
        assert_ne!(id, Layout::compute(&renamed).version_id());
        assert_ne!(id, Layout::compute(&retyped).version_id());
        assert_ne!(id, Layout::compute(&reordered).version_id());
    }
}
