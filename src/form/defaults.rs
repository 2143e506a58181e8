//! Default values per declared field

use serde_json::{Map, Value};

use crate::codec::{FieldValue, Record};
use crate::schema::{FieldDecl, FieldType, SchemaTable};

use super::convert::convert_json_value;

/// Default value of every declared field, in table order.
///
/// A declared default is used as written, except that numeric-string
/// defaults of float fields ("2.4e9") become numbers. Fields without a
/// default get the zero value of their type.
pub fn default_values(table: &SchemaTable) -> Map<String, Value> {
    table
        .declared()
        .iter()
        .map(|decl| (decl.name.clone(), default_for(decl)))
        .collect()
}

/// Typed defaults, ready to pack.
///
/// Declared defaults that do not convert to the field's type fall back to
/// the zero value.
pub fn default_record(table: &SchemaTable) -> Record {
    table
        .declared()
        .iter()
        .map(|decl| {
            let value = convert_json_value(decl.field_type, &default_for(decl))
                .unwrap_or_else(|_| FieldValue::zero(decl.field_type));
            (decl.name.clone(), value)
        })
        .collect()
}

fn default_for(decl: &FieldDecl) -> Value {
    match &decl.default {
        Some(Value::String(text)) if decl.field_type.is_float() => text
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.clone())),
        Some(value) => value.clone(),
        None => zero_json(decl.field_type),
    }
}

fn zero_json(field_type: FieldType) -> Value {
    FieldValue::zero(field_type).to_json()
}
