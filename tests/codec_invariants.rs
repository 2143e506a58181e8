//! Codec Invariant Tests
//!
//! Wire-level guarantees of sharemap frames:
//! - frame length is fixed per table and equals the sum of field widths
//! - bookkeeping fields lead every frame
//! - integers big-endian, floats little-endian
//! - unpack checks size before anything, version after a full decode
//! - the version id depends only on declared names and types, in order

use serde_json::{json, Value};

use sharemap::codec::{build_codec, Codec, CodecError, FieldValue, Record};
use sharemap::schema::{build_schema, FieldType, SchemaTable};

// =============================================================================
// Helper Functions
// =============================================================================

fn table(document: Value) -> SchemaTable {
    build_schema(&document).unwrap()
}

fn slot_of<'a>(codec: &Codec, frame: &'a [u8], name: &str) -> &'a [u8] {
    &frame[codec.layout().field(name).unwrap().range()]
}

fn all_types_table() -> SchemaTable {
    table(json!({
        "a_u8": { "type": "u8", "desc": "" },
        "a_u16": { "type": "u16", "desc": "" },
        "a_u32": { "type": "u32", "desc": "" },
        "a_u64": { "type": "u64", "desc": "" },
        "a_i8": { "type": "i8", "desc": "" },
        "a_i16": { "type": "i16", "desc": "" },
        "a_i32": { "type": "i32", "desc": "" },
        "a_i64": { "type": "i64", "desc": "" },
        "a_f32": { "type": "f32", "desc": "" },
        "a_f64": { "type": "f64", "desc": "" },
        "a_bool": { "type": "boolean", "desc": "" },
        "a_str": { "type": "string", "desc": "" }
    }))
}

fn all_types_record() -> Record {
    Record::new()
        .with("a_u8", u8::MAX)
        .with("a_u16", 0x1234u16)
        .with("a_u32", u32::MAX)
        .with("a_u64", u64::MAX)
        .with("a_i8", i8::MIN)
        .with("a_i16", -2i16)
        .with("a_i32", i32::MIN)
        .with("a_i64", i64::MIN)
        .with("a_f32", -0.5f32)
        .with("a_f64", 2.4e9f64)
        .with("a_bool", true)
        .with("a_str", "héllo")
}

// =============================================================================
// Layout Tests
// =============================================================================

/// Frame length is 18 bookkeeping bytes plus every declared width.
#[test]
fn test_frame_length_is_sum_of_widths() {
    let codec = Codec::new(all_types_table());
    let expected: usize = 18 + FieldType::ALL.iter().map(|t| t.width()).sum::<usize>();
    assert_eq!(codec.frame_length(), expected);
    assert_eq!(codec.pack(&all_types_record()).unwrap().len(), expected);
}

/// An empty declaration still produces an 18-byte frame.
#[test]
fn test_empty_schema_frame() {
    let codec = Codec::new(table(json!({})));
    let frame = codec.pack(&Record::new()).unwrap();
    assert_eq!(frame.len(), 18);
    let decoded = codec.unpack(&frame).unwrap();
    assert_eq!(decoded.len(), 3);
}

// =============================================================================
// Encoding Tests
// =============================================================================

/// Integers are big-endian, floats little-endian, strings null-padded.
#[test]
fn test_byte_order_per_type() {
    let codec = Codec::new(all_types_table());
    let frame = codec.pack_at(&all_types_record(), 0x0102030405060708).unwrap();
    let slot = |name: &str| slot_of(&codec, &frame, name).to_vec();

    assert_eq!(slot("unix_timestamp_ns"), &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert_eq!(slot("a_u16"), &[0x12, 0x34]);
    assert_eq!(slot("a_i16"), &[0xff, 0xfe]);
    assert_eq!(slot("a_i8"), &[0x80]);
    assert_eq!(slot("a_f32"), &(-0.5f32).to_le_bytes());
    assert_eq!(slot("a_f64"), &2.4e9f64.to_le_bytes());
    assert_eq!(slot("a_bool"), &[1]);

    let text = slot("a_str");
    assert_eq!(&text[..6], "héllo".as_bytes());
    assert!(text[6..].iter().all(|b| *b == 0));
}

/// Every declared value survives pack / unpack unchanged.
#[test]
fn test_round_trip_all_types() {
    let codec = Codec::new(all_types_table());
    let record = all_types_record();
    let decoded = codec.unpack(&codec.pack(&record).unwrap()).unwrap();

    for (name, value) in record.iter() {
        assert_eq!(decoded.get(name), Some(value), "field {}", name);
    }
    let names: Vec<&str> = decoded.names().take(3).collect();
    assert_eq!(names, vec!["source_id", "schema_hash", "unix_timestamp_ns"]);
}

/// A failed pack produces no frame at all.
#[test]
fn test_pack_is_all_or_nothing() {
    let codec = Codec::new(all_types_table());
    let mut record = all_types_record();
    record.insert("a_str", "x".repeat(64));
    assert!(matches!(
        codec.pack(&record),
        Err(CodecError::StringTooLong { len: 64, max: 63, .. })
    ));
}

// =============================================================================
// Unpack Ordering Tests
// =============================================================================

/// A truncated frame carrying a foreign hash reports size, not version.
#[test]
fn test_size_mismatch_wins_over_version() {
    let codec = Codec::new(table(json!({ "gain_db": { "type": "f32", "desc": "" } })));
    let other = Codec::new(table(json!({ "gain": { "type": "f32", "desc": "" } })));

    let frame = other.pack(&Record::new().with("gain", 1.0f32)).unwrap();
    assert_eq!(
        codec.unpack(&frame[..21]).unwrap_err(),
        CodecError::SizeMismatch {
            expected: 22,
            actual: 21
        }
    );
    assert_eq!(
        codec.unpack(&frame).unwrap_err(),
        CodecError::VersionMismatch {
            expected: codec.version_id(),
            actual: other.version_id()
        }
    );
}

/// Frames from a retyped field are refused even at equal length.
#[test]
fn test_retyped_field_rejected() {
    let as_u32 = Codec::new(table(json!({ "count": { "type": "u32", "desc": "" } })));
    let as_f32 = Codec::new(table(json!({ "count": { "type": "f32", "desc": "" } })));
    assert_eq!(as_u32.frame_length(), as_f32.frame_length());

    let frame = as_f32.pack(&Record::new().with("count", 1.0f32)).unwrap();
    assert!(matches!(
        as_u32.unpack(&frame),
        Err(CodecError::VersionMismatch { .. })
    ));
}

// =============================================================================
// Version Identifier Tests
// =============================================================================

/// Identical declarations built twice agree on the identifier.
#[test]
fn test_version_id_is_deterministic() {
    let a = Codec::new(all_types_table());
    let b = Codec::new(all_types_table());
    assert_eq!(a.version_id(), b.version_id());
}

/// Metadata changes never move the identifier.
#[test]
fn test_version_id_ignores_metadata() {
    let plain = Codec::new(table(json!({ "mode": { "type": "string", "desc": "a" } })));
    let decorated = Codec::new(table(json!({
        "mode": { "type": "string", "desc": "b", "options": ["QPSK", "BPSK"], "default": "QPSK" }
    })));
    assert_eq!(plain.version_id(), decorated.version_id());
}

/// Float decoding yields the logical value exactly.
#[test]
fn test_gain_example_decodes() {
    let codec = build_codec(table(json!({
        "gain_db": { "type": "f32", "desc": "Gain", "min": -10, "max": 20 }
    })));
    let frame = codec.pack(&Record::new().with("gain_db", 5.0f32)).unwrap();
    assert_eq!(frame.len(), 22);
    assert_eq!(&frame[18..22], &5.0f32.to_le_bytes());
    assert_eq!(
        codec.unpack(&frame).unwrap().get("gain_db"),
        Some(&FieldValue::F32(5.0))
    );
}
