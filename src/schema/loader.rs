//! Schema document loader
//!
//! A schema file maps section names to field mappings, in YAML or JSON:
//!
//! ```yaml
//! config:
//!   tx_enable: { type: boolean, desc: Enable TX }
//! metrics:
//!   tx_bytes_total: { type: u64, desc: Bytes sent }
//! ```
//!
//! `.json` origins are read as JSON and `.yaml` / `.yml` origins as YAML.
//! Any other origin is tried as JSON first, then as YAML. Mapping order in
//! the file is kept in both formats.
//!
//! The loader only reads the path it is handed. Callers decide which file and
//! which section; nothing here consults ambient locations.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::builder::build_schema;
use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaTable;

/// Text format of a schema document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Format implied by the origin's extension, if any
    pub fn from_origin(origin: &str) -> Option<Self> {
        let extension = Path::new(origin).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(SchemaFormat::Json),
            "yaml" | "yml" => Some(SchemaFormat::Yaml),
            _ => None,
        }
    }

    fn parse(self, content: &str, origin: &str) -> SchemaResult<Value> {
        match self {
            SchemaFormat::Json => serde_json::from_str(content)
                .map_err(|e| SchemaError::malformed(origin, format!("Invalid JSON: {}", e))),
            SchemaFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| SchemaError::malformed(origin, format!("Invalid YAML: {}", e))),
        }
    }
}

/// A parsed multi-section schema document
#[derive(Debug, Clone)]
pub struct SchemaDocument {
    /// Where the document came from, for error messages
    origin: String,
    /// Section name → field mapping, in file order
    sections: Map<String, Value>,
}

impl SchemaDocument {
    /// Reads and parses a schema file.
    pub fn from_path(path: &Path) -> SchemaResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;
        Self::parse(&content, path.display().to_string())
    }

    /// Parses a schema document from text.
    pub fn parse(content: &str, origin: impl Into<String>) -> SchemaResult<Self> {
        let origin = origin.into();
        let root = match SchemaFormat::from_origin(&origin) {
            Some(format) => format.parse(content, &origin)?,
            None => match SchemaFormat::Json.parse(content, &origin) {
                Ok(root) => root,
                Err(_) => SchemaFormat::Yaml.parse(content, &origin)?,
            },
        };

        match root {
            Value::Object(sections) => Ok(Self { origin, sections }),
            _ => Err(SchemaError::malformed(
                origin,
                "top level must map section names to field mappings",
            )),
        }
    }

    /// Builds the table for one section.
    pub fn section(&self, name: &str) -> SchemaResult<SchemaTable> {
        let raw = self
            .sections
            .get(name)
            .ok_or_else(|| SchemaError::MissingSection(name.to_string()))?;
        build_schema(raw)
    }

    /// Raw field mapping for one section, as written in the file
    pub fn raw_section(&self, name: &str) -> Option<&Value> {
        self.sections.get(name)
    }

    /// Section names in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Builds every section in file order.
    pub fn sections(&self) -> SchemaResult<Vec<(String, SchemaTable)>> {
        self.sections
            .iter()
            .map(|(name, raw)| build_schema(raw).map(|table| (name.clone(), table)))
            .collect()
    }

    /// Where the document was loaded from
    pub fn origin(&self) -> &str {
        &self.origin
    }
}
