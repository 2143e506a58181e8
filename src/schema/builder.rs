//! Builds a schema table from an already-parsed document
//!
//! Document shape:
//!
//! ```json
//! {
//!   "gain_db": { "type": "f32", "desc": "Gain", "min": -10, "max": 20 },
//!   "mode":    { "type": "string", "desc": "Modulation", "options": ["BPSK", "QPSK"] }
//! }
//! ```
//!
//! Field order in the table is the key order of the mapping. Bounds, options
//! and mutex partners are recorded but not checked here.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};
use super::types::{is_bookkeeping, FieldDecl, FieldType, SchemaTable};

/// Builds a schema table from a field-name → declaration mapping.
///
/// # Errors
///
/// - `NotAMapping` if the document is not an object
/// - `InvalidDeclaration` if a declaration is not an object or an optional
///   attribute has the wrong shape
/// - `MissingAttribute` if `type` or `desc` is absent
/// - `UnknownType` if `type` is not in the registry
/// - `ReservedField` if a declared name collides with a bookkeeping field
pub fn build_schema(document: &Value) -> SchemaResult<SchemaTable> {
    let mapping = document.as_object().ok_or(SchemaError::NotAMapping)?;

    let mut declared = Vec::with_capacity(mapping.len());
    for (name, details) in mapping {
        if is_bookkeeping(name) {
            return Err(SchemaError::ReservedField(name.clone()));
        }
        declared.push(parse_declaration(name, details)?);
    }

    Ok(SchemaTable::from_declared(declared))
}

fn parse_declaration(name: &str, details: &Value) -> SchemaResult<FieldDecl> {
    let attrs = details.as_object().ok_or_else(|| SchemaError::InvalidDeclaration {
        field: name.to_string(),
        reason: "declaration must be a mapping".into(),
    })?;

    let type_tag = required_str(name, attrs, "type")?;
    let field_type = FieldType::from_tag(type_tag).ok_or_else(|| SchemaError::UnknownType {
        field: name.to_string(),
        type_tag: type_tag.to_string(),
    })?;
    let desc = required_str(name, attrs, "desc")?;

    let mut decl = FieldDecl::new(name, desc, field_type);
    decl.default = attrs.get("default").cloned();
    decl.min = optional_bound(name, attrs, "min")?;
    decl.max = optional_bound(name, attrs, "max")?;
    decl.options = optional_options(name, attrs)?;
    decl.mutex_with = optional_str(name, attrs, "mutex_with")?;
    decl.unit = optional_str(name, attrs, "unit")?;

    Ok(decl)
}

fn required_str<'a>(
    field: &str,
    attrs: &'a Map<String, Value>,
    attribute: &'static str,
) -> SchemaResult<&'a str> {
    match attrs.get(attribute) {
        None | Some(Value::Null) => Err(SchemaError::MissingAttribute {
            field: field.to_string(),
            attribute,
        }),
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(SchemaError::InvalidDeclaration {
            field: field.to_string(),
            reason: format!("'{}' must be a string, got {}", attribute, other),
        }),
    }
}

fn optional_str(
    field: &str,
    attrs: &Map<String, Value>,
    attribute: &str,
) -> SchemaResult<Option<String>> {
    match attrs.get(attribute) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SchemaError::InvalidDeclaration {
            field: field.to_string(),
            reason: format!("'{}' must be a string, got {}", attribute, other),
        }),
    }
}

/// Bounds may be written as numbers or numeric strings ("2.4e9").
fn optional_bound(
    field: &str,
    attrs: &Map<String, Value>,
    attribute: &str,
) -> SchemaResult<Option<f64>> {
    let invalid = |raw: &Value| SchemaError::InvalidDeclaration {
        field: field.to_string(),
        reason: format!("'{}' must be numeric, got {}", attribute, raw),
    };

    match attrs.get(attribute) {
        None | Some(Value::Null) => Ok(None),
        Some(raw @ Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| invalid(raw)),
        Some(raw @ Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| invalid(raw)),
        Some(raw) => Err(invalid(raw)),
    }
}

fn optional_options(field: &str, attrs: &Map<String, Value>) -> SchemaResult<Option<Vec<String>>> {
    let items = match attrs.get("options") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(SchemaError::InvalidDeclaration {
                field: field.to_string(),
                reason: format!("'options' must be a list, got {}", other),
            })
        }
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(SchemaError::InvalidDeclaration {
                field: field.to_string(),
                reason: format!("option {} is not a scalar", other),
            }),
        })
        .collect::<SchemaResult<Vec<_>>>()
        .map(Some)
}
