//! Conversion of raw front-end input to typed values
//!
//! Form input arrives as text. Conversion rules per type:
//! - boolean: true when the lowercased text is one of true / on / 1 / yes
//! - integers: parsed as a float then truncated toward zero, so "2.4e3"
//!   and "7.9" are accepted; the result must fit the declared width
//! - floats: parsed as a float
//! - string: taken verbatim

use serde_json::{Map, Value};

use crate::codec::{float32_value, integer_value, CodecError, CodecResult, FieldValue, Record};
use crate::schema::{FieldType, SchemaTable};

/// Converts raw form text to a value of the given type.
///
/// The error's field name is left empty; `convert_values` fills it in.
pub fn convert_form_value(field_type: FieldType, raw: &str) -> CodecResult<FieldValue> {
    convert_named("", field_type, raw)
}

/// Converts a JSON value through its text form, as a form post would.
pub fn convert_json_value(field_type: FieldType, raw: &Value) -> CodecResult<FieldValue> {
    convert_form_value(field_type, &text_form(raw))
}

/// Converts a full candidate set to a packable record.
///
/// Only declared fields are converted; every declared field must be present.
/// Bookkeeping and unknown keys are ignored.
pub fn convert_values(table: &SchemaTable, values: &Map<String, Value>) -> CodecResult<Record> {
    let mut record = Record::new();
    for decl in table.declared() {
        let raw = values
            .get(&decl.name)
            .ok_or_else(|| CodecError::MissingField(decl.name.clone()))?;
        record.insert(
            decl.name.clone(),
            convert_named(&decl.name, decl.field_type, &text_form(raw))?,
        );
    }
    Ok(record)
}

fn convert_named(field: &str, field_type: FieldType, raw: &str) -> CodecResult<FieldValue> {
    let mismatch = || CodecError::TypeMismatch {
        field: field.to_string(),
        expected: field_type,
        actual: format!("'{}'", raw),
    };

    match field_type {
        FieldType::Boolean => Ok(FieldValue::Bool(matches!(
            raw.to_lowercase().as_str(),
            "true" | "on" | "1" | "yes"
        ))),
        FieldType::String => Ok(FieldValue::Str(raw.to_string())),
        FieldType::F32 => {
            let wide = parse_float(raw).ok_or_else(mismatch)?;
            float32_value(wide)
                .map(FieldValue::F32)
                .ok_or_else(|| CodecError::ValueOutOfRange {
                    field: field.to_string(),
                    field_type,
                    value: raw.to_string(),
                })
        }
        FieldType::F64 => parse_float(raw).map(FieldValue::F64).ok_or_else(mismatch),
        ty => {
            let parsed = parse_float(raw).filter(|v| v.is_finite()).ok_or_else(mismatch)?;
            integer_value(ty, parsed.trunc() as i128).ok_or_else(|| CodecError::ValueOutOfRange {
                field: field.to_string(),
                field_type: ty,
                value: raw.to_string(),
            })
        }
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Text a form would have posted for this value
fn text_form(raw: &Value) -> String {
    match raw {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_schema;
    use serde_json::json;

    #[test]
    fn test_boolean_words() {
        for raw in ["true", "On", "1", "YES"] {
            assert_eq!(convert_form_value(FieldType::Boolean, raw).unwrap(), FieldValue::Bool(true));
        }
        for raw in ["false", "off", "0", "", "y"] {
            assert_eq!(convert_form_value(FieldType::Boolean, raw).unwrap(), FieldValue::Bool(false));
        }
    }

    #[test]
    fn test_integers_truncate_and_range_check() {
        assert_eq!(convert_form_value(FieldType::U32, "2.4e3").unwrap(), FieldValue::U32(2400));
        assert_eq!(convert_form_value(FieldType::I8, "-7.9").unwrap(), FieldValue::I8(-7));
        assert_eq!(
            convert_form_value(FieldType::U8, "256").unwrap_err().code(),
            "SHAREMAP_VALUE_OUT_OF_RANGE"
        );
        assert_eq!(
            convert_form_value(FieldType::U16, "abc").unwrap_err().code(),
            "SHAREMAP_TYPE_MISMATCH"
        );
        assert_eq!(
            convert_form_value(FieldType::I64, "inf").unwrap_err().code(),
            "SHAREMAP_TYPE_MISMATCH"
        );
    }

    #[test]
    fn test_floats_and_strings() {
        assert_eq!(convert_form_value(FieldType::F64, "1e-3").unwrap(), FieldValue::F64(0.001));
        assert_eq!(convert_form_value(FieldType::F32, " 1.5 ").unwrap(), FieldValue::F32(1.5));
        assert_eq!(
            convert_form_value(FieldType::String, " spaced ").unwrap(),
            FieldValue::Str(" spaced ".into())
        );
    }

    #[test]
    fn test_f32_overflow_rejected() {
        assert_eq!(
            convert_form_value(FieldType::F32, "1e39").unwrap_err().code(),
            "SHAREMAP_VALUE_OUT_OF_RANGE"
        );
        assert_eq!(
            convert_json_value(FieldType::F32, &json!(-1e39)).unwrap_err().code(),
            "SHAREMAP_VALUE_OUT_OF_RANGE"
        );
        assert_eq!(convert_form_value(FieldType::F64, "1e39").unwrap(), FieldValue::F64(1e39));
    }

    #[test]
    fn test_json_values_use_text_form() {
        assert_eq!(convert_json_value(FieldType::Boolean, &json!(true)).unwrap(), FieldValue::Bool(true));
        assert_eq!(convert_json_value(FieldType::U16, &json!(12)).unwrap(), FieldValue::U16(12));
        assert_eq!(convert_json_value(FieldType::U16, &json!("12")).unwrap(), FieldValue::U16(12));
        assert_eq!(convert_json_value(FieldType::F32, &json!(2)).unwrap(), FieldValue::F32(2.0));
    }

    #[test]
    fn test_convert_values_names_the_field() {
        let table = build_schema(&json!({
            "a": { "type": "u8", "desc": "" },
            "b": { "type": "string", "desc": "" }
        }))
        .unwrap();

        let record = convert_values(&table, json!({ "a": "3", "b": "x", "extra": 1 }).as_object().unwrap()).unwrap();
        assert_eq!(record.names().collect::<Vec<_>>(), vec!["a", "b"]);

        let err = convert_values(&table, json!({ "a": 300, "b": "x" }).as_object().unwrap()).unwrap_err();
        assert_eq!(
            err,
            CodecError::ValueOutOfRange {
                field: "a".into(),
                field_type: FieldType::U8,
                value: "300".into()
            }
        );

        let err = convert_values(&table, json!({ "a": 1 }).as_object().unwrap()).unwrap_err();
        assert_eq!(err, CodecError::MissingField("b".into()));
    }
}
