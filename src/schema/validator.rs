//! Advisory validation of candidate field values
//!
//! Used by interactive front ends before values are converted and packed.
//! The codec never calls into this module: pack only enforces presence and
//! encodability.
//!
//! Rules:
//! - numeric fields: candidate parses as a number and lies in `[min, max]`
//! - string fields: candidate is a string, a member of `options` when
//!   declared, and at most 63 UTF-8 bytes
//! - mutex pairs: two linked fields must not both be truthy; each pair is
//!   reported once

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::errors::ValidationError;
use super::types::{FieldDecl, FieldType, SchemaTable, MAX_STRING_BYTES};

/// Outcome of validating a full set of candidate values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Per-field failures, in table order
    pub fields: Vec<(String, Vec<ValidationError>)>,
    /// Mutex violations
    pub mutex: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.fields.is_empty() && self.mutex.is_empty()
    }

    /// Failures for one field
    pub fn field_errors(&self, name: &str) -> Option<&[ValidationError]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, errors)| errors.as_slice())
    }

    /// Renders as `{ field: [messages], "_mutex": [messages] }`
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for (field, errors) in &self.fields {
            let messages: Vec<Value> = errors.iter().map(|e| e.to_string().into()).collect();
            out.insert(field.clone(), Value::Array(messages));
        }
        if !self.mutex.is_empty() {
            let messages: Vec<Value> = self.mutex.iter().map(|e| e.to_string().into()).collect();
            out.insert("_mutex".into(), Value::Array(messages));
        }
        Value::Object(out)
    }

    /// One line per failing field: `field: msg, msg`
    pub fn messages(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .fields
            .iter()
            .map(|(field, errors)| {
                let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
                format!("{}: {}", field, joined.join(", "))
            })
            .collect();
        lines.extend(self.mutex.iter().map(ToString::to_string));
        lines
    }
}

/// Validator over one schema table.
///
/// Validation is deterministic and never mutates the candidate values.
pub struct SchemaValidator<'a> {
    table: &'a SchemaTable,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(table: &'a SchemaTable) -> Self {
        Self { table }
    }

    /// Validates one candidate value against one declaration.
    ///
    /// Returns every failure found, empty when the value is acceptable.
    pub fn validate_field(decl: &FieldDecl, candidate: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let field = || decl.name.clone();

        match decl.field_type {
            ty if ty.is_numeric() => match numeric_value(candidate) {
                Some(value) => {
                    if let Some(bound) = decl.min {
                        if value < bound {
                            errors.push(ValidationError::BelowMin { field: field(), value, bound });
                        }
                    }
                    if let Some(bound) = decl.max {
                        if value > bound {
                            errors.push(ValidationError::AboveMax { field: field(), value, bound });
                        }
                    }
                }
                None => errors.push(ValidationError::NotANumber { field: field() }),
            },
            FieldType::String => match candidate.as_str() {
                Some(text) => {
                    if let Some(options) = &decl.options {
                        if !options.iter().any(|o| o == text) {
                            errors.push(ValidationError::InvalidOption {
                                field: field(),
                                value: text.to_string(),
                                options: options.clone(),
                            });
                        }
                    }
                    if text.len() > MAX_STRING_BYTES {
                        errors.push(ValidationError::StringTooLong {
                            field: field(),
                            len: text.len(),
                            max: MAX_STRING_BYTES,
                        });
                    }
                }
                None => errors.push(ValidationError::NotAString { field: field() }),
            },
            _ => {}
        }

        errors
    }

    /// Checks every declared mutex pair once.
    ///
    /// Absent fields count as not enabled.
    pub fn validate_mutex(&self, values: &Map<String, Value>) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut checked: HashSet<&str> = HashSet::new();

        for decl in self.table.declared() {
            let Some(partner) = decl.mutex_with.as_deref() else {
                continue;
            };
            if checked.contains(decl.name.as_str()) {
                continue;
            }
            checked.insert(decl.name.as_str());
            checked.insert(partner);

            let first = values.get(&decl.name).map_or(false, is_truthy);
            let second = values.get(partner).map_or(false, is_truthy);
            if first && second {
                errors.push(ValidationError::MutexViolation {
                    first: decl.name.clone(),
                    second: partner.to_string(),
                });
            }
        }

        errors
    }

    /// Validates a full candidate set: every declared field must be present
    /// and acceptable, and no mutex pair may be violated.
    pub fn validate_record(&self, values: &Map<String, Value>) -> ValidationReport {
        let mut report = ValidationReport::default();

        for decl in self.table.declared() {
            let errors = match values.get(&decl.name) {
                Some(candidate) => Self::validate_field(decl, candidate),
                None => vec![ValidationError::Required {
                    field: decl.name.clone(),
                }],
            };
            if !errors.is_empty() {
                report.fields.push((decl.name.clone(), errors));
            }
        }

        report.mutex = self.validate_mutex(values);
        report
    }
}

/// Shorthand for `SchemaValidator::new(table).validate_record(values)`
pub fn validate_record(table: &SchemaTable, values: &Map<String, Value>) -> ValidationReport {
    SchemaValidator::new(table).validate_record(values)
}

/// Numbers and numeric strings ("2.4e9") parse; everything else does not.
fn numeric_value(candidate: &Value) -> Option<f64> {
    match candidate {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Truthiness of a candidate value as a front end sees it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::build_schema;
    use serde_json::json;

    fn sample_table() -> SchemaTable {
        build_schema(&json!({
            "gain_db": { "type": "f32", "desc": "Gain", "min": -10, "max": 20 },
            "mode": { "type": "string", "desc": "Modulation", "options": ["BPSK", "QPSK"] },
            "label": { "type": "string", "desc": "Free text" },
            "stx1_enable": { "type": "boolean", "desc": "STX1", "mutex_with": "stx2_enable" },
            "stx2_enable": { "type": "boolean", "desc": "STX2", "mutex_with": "stx1_enable" }
        }))
        .unwrap()
    }

    #[test]
    fn test_numeric_bounds_inclusive() {
        let table = sample_table();
        let gain = table.field("gain_db").unwrap();
        assert!(SchemaValidator::validate_field(gain, &json!(-10)).is_empty());
        assert!(SchemaValidator::validate_field(gain, &json!(20.0)).is_empty());

        let errors = SchemaValidator::validate_field(gain, &json!(20.5));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_out_of_range());

        let errors = SchemaValidator::validate_field(gain, &json!("-11"));
        assert!(matches!(errors[0], ValidationError::BelowMin { .. }));
    }

    #[test]
    fn test_numeric_strings_accepted() {
        let table = sample_table();
        let gain = table.field("gain_db").unwrap();
        assert!(SchemaValidator::validate_field(gain, &json!("1.5e1")).is_empty());

        let errors = SchemaValidator::validate_field(gain, &json!("loud"));
        assert_eq!(errors, vec![ValidationError::NotANumber { field: "gain_db".into() }]);

        let errors = SchemaValidator::validate_field(gain, &json!(true));
        assert_eq!(errors[0].code(), "SHAREMAP_NOT_A_NUMBER");
    }

    #[test]
    fn test_option_membership() {
        let table = sample_table();
        let mode = table.field("mode").unwrap();
        assert!(SchemaValidator::validate_field(mode, &json!("QPSK")).is_empty());

        let errors = SchemaValidator::validate_field(mode, &json!("qpsk"));
        assert_eq!(errors[0].code(), "SHAREMAP_INVALID_OPTION");
    }

    #[test]
    fn test_string_length_limit() {
        let table = sample_table();
        let label = table.field("label").unwrap();
        assert!(SchemaValidator::validate_field(label, &json!("a".repeat(63))).is_empty());

        let errors = SchemaValidator::validate_field(label, &json!("a".repeat(64)));
        assert_eq!(
            errors,
            vec![ValidationError::StringTooLong {
                field: "label".into(),
                len: 64,
                max: 63
            }]
        );
    }

    #[test]
    fn test_mutex_reported_once() {
        let table = sample_table();
        let validator = SchemaValidator::new(&table);

        let values = json!({ "stx1_enable": true, "stx2_enable": true });
        let errors = validator.validate_mutex(values.as_object().unwrap());
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0],
            ValidationError::MutexViolation {
                first: "stx1_enable".into(),
                second: "stx2_enable".into()
            }
        );

        let values = json!({ "stx1_enable": true, "stx2_enable": false });
        assert!(validator.validate_mutex(values.as_object().unwrap()).is_empty());

        let values = json!({ "stx1_enable": true });
        assert!(validator.validate_mutex(values.as_object().unwrap()).is_empty());
    }

    #[test]
    fn test_validate_record_requires_all_fields() {
        let table = sample_table();
        let validator = SchemaValidator::new(&table);

        let values = json!({ "gain_db": 5.0, "mode": "BPSK" });
        let report = validator.validate_record(values.as_object().unwrap());
        assert!(!report.is_valid());
        assert!(report.field_errors("gain_db").is_none());
        assert_eq!(
            report.field_errors("label").unwrap()[0].code(),
            "SHAREMAP_FIELD_REQUIRED"
        );

        let json = report.to_json();
        assert_eq!(json["label"][0], "Field is required");
    }

    #[test]
    fn test_validate_record_passes() {
        let table = sample_table();
        let validator = SchemaValidator::new(&table);

        let values = json!({
            "gain_db": 5.0,
            "mode": "BPSK",
            "label": "ok",
            "stx1_enable": false,
            "stx2_enable": true
        });
        let report = validator.validate_record(values.as_object().unwrap());
        assert!(report.is_valid(), "{:?}", report.messages());
        assert_eq!(report.to_json(), json!({}));
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("on")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }
}
