//! Console output for the CLI
//!
//! - `write_json`: pretty JSON to stdout (grab)
//! - `render_layout`: layout table (inspect)
//! - `render_frame`: grouped, type-aware dump of a decoded frame (receive)

use std::fmt::Write as _;
use std::io::{self, Write};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::codec::{Codec, FieldValue, Record};
use crate::form::{group_of, FieldGroup};
use crate::schema::{is_bookkeeping, FieldType, SchemaTable, SCHEMA_HASH, SOURCE_ID, UNIX_TIMESTAMP_NS};

use super::errors::CliResult;

const RULE_WIDTH: usize = 60;

/// Write pretty JSON to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}

/// Write preformatted text to stdout
pub fn write_text(text: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Formats a value for display according to its declared type.
///
/// - floats: 4 decimals, or 4-digit scientific when |v| >= 1e6 or
///   0 < |v| < 1e-3
/// - booleans: "✓ True" / "✗ False"
/// - 64-bit integers: thousands separators
pub fn format_value(value: &FieldValue, field_type: FieldType) -> String {
    match (field_type, value) {
        (FieldType::F32 | FieldType::F64, v) => match v.as_f64() {
            Some(f) => format_float(f),
            None => v.to_string(),
        },
        (FieldType::Boolean, FieldValue::Bool(true)) => "✓ True".to_string(),
        (FieldType::Boolean, FieldValue::Bool(false)) => "✗ False".to_string(),
        (FieldType::U64, FieldValue::U64(v)) => group_thousands(&v.to_string()),
        (FieldType::I64, FieldValue::I64(v)) => group_thousands(&v.to_string()),
        (_, v) => v.to_string(),
    }
}

fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e6 || (magnitude < 1e-3 && value != 0.0) {
        scientific(value)
    } else {
        format!("{:.4}", value)
    }
}

/// `1.2346e+06` style: signed exponent, at least two digits
fn scientific(value: f64) -> String {
    let rendered = format!("{:.4e}", value);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => format!(
                "{}e{}{:02}",
                mantissa,
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => rendered,
        },
        // inf / NaN
        None => rendered,
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    format!("{}{}", sign, out)
}

/// Renders a frame timestamp as UTC wall-clock time with microseconds
pub fn format_timestamp(ns: i64) -> String {
    let secs = ns.div_euclid(1_000_000_000);
    let nanos = ns.rem_euclid(1_000_000_000) as u32;
    match DateTime::<Utc>::from_timestamp(secs, nanos) {
        Some(at) => at.format("%Y-%m-%d %H:%M:%S%.6f UTC").to_string(),
        None => ns.to_string(),
    }
}

/// Layout table for `inspect`
pub fn render_layout(section: &str, codec: &Codec) -> String {
    let layout = codec.layout();
    let name_width = layout
        .fields()
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    let _ = writeln!(out, "section:      {}", section);
    let _ = writeln!(out, "frame length: {} bytes", layout.frame_length());
    let _ = writeln!(out, "version id:   {:#018x}", layout.version_id());
    let _ = writeln!(out);
    let _ = writeln!(out, "{:<w$}  {:<7}  {:>6}  {:>5}", "name", "type", "offset", "width", w = name_width);
    for placed in layout.fields() {
        let _ = writeln!(
            out,
            "{:<w$}  {:<7}  {:>6}  {:>5}",
            placed.name,
            placed.field_type.tag(),
            placed.offset,
            placed.width,
            w = name_width
        );
    }
    out
}

/// Grouped dump of one decoded frame for `receive`
pub fn render_frame(record: &Record, table: &SchemaTable, groups: &[FieldGroup]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "Frame received at {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "{}", rule);

    let mut current_group: Option<&str> = None;
    for (name, value) in record.iter().filter(|(name, _)| !is_bookkeeping(name)) {
        let group = group_of(name, groups);
        if current_group != Some(group) {
            let _ = writeln!(out, "\n--- {} ---", group);
            current_group = Some(group);
        }

        let decl = table.field(name);
        let field_type = decl.map_or(value.field_type(), |d| d.field_type);
        let unit = decl
            .and_then(|d| d.unit.as_deref())
            .map(|u| format!(" {}", u))
            .unwrap_or_default();
        let _ = writeln!(out, "  {}: {}{}", name, format_value(value, field_type), unit);
    }

    let _ = writeln!(out, "\n--- Internal Fields ---");
    if let Some(source) = record.get(SOURCE_ID) {
        let _ = writeln!(out, "  source_id: {}", source);
    }
    if let Some(hash) = record.get(SCHEMA_HASH).and_then(FieldValue::as_u64) {
        let _ = writeln!(out, "  schema_hash: {:#x}", hash);
    }
    if let Some(ts) = record.get(UNIX_TIMESTAMP_NS).and_then(FieldValue::as_i64) {
        let _ = writeln!(out, "  timestamp: {}", format_timestamp(ts));
    }
    let _ = writeln!(out, "{}", rule);
    out
}
