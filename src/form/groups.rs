//! Prefix grouping of fields for display

use serde::{Deserialize, Serialize};

use crate::schema::{FieldDecl, SchemaTable};

/// Label of the group collecting fields that match no prefix
pub const OTHER_GROUP: &str = "Other";

/// A display group: every field whose name starts with `prefix`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub label: String,
    pub prefix: String,
}

impl FieldGroup {
    pub fn new(label: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            prefix: prefix.into(),
        }
    }

    /// Radio groups used by the stock configuration schema
    pub fn defaults() -> Vec<FieldGroup> {
        vec![
            FieldGroup::new("PSK CC TX", "psk_cc_tx"),
            FieldGroup::new("PSK CC RX", "psk_cc_rx"),
            FieldGroup::new("DVB-S2 TX", "dvbs2_tx"),
            FieldGroup::new("GFSK TX", "gfsk_tx"),
            FieldGroup::new("Anylink", "anylink"),
        ]
    }
}

/// Fields of one group, in table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedFields<'a> {
    pub label: String,
    #[serde(serialize_with = "serialize_names")]
    pub fields: Vec<&'a FieldDecl>,
}

fn serialize_names<S: serde::Serializer>(fields: &[&FieldDecl], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(fields.iter().map(|decl| decl.name.as_str()))
}

/// Label of the first group whose prefix matches `name`, else "Other"
pub fn group_of<'g>(name: &str, groups: &'g [FieldGroup]) -> &'g str {
    groups
        .iter()
        .find(|group| name.starts_with(&group.prefix))
        .map_or(OTHER_GROUP, |group| group.label.as_str())
}

/// Sorts declared fields into groups.
///
/// Every configured group is returned, in configured order, even when empty.
/// An "Other" group is appended only when some field matched no prefix.
pub fn group_fields<'a>(table: &'a SchemaTable, groups: &[FieldGroup]) -> Vec<GroupedFields<'a>> {
    let mut out: Vec<GroupedFields<'a>> = groups
        .iter()
        .map(|group| GroupedFields {
            label: group.label.clone(),
            fields: Vec::new(),
        })
        .collect();
    let mut other = Vec::new();

    for decl in table.declared() {
        match groups.iter().position(|group| decl.name.starts_with(&group.prefix)) {
            Some(index) => out[index].fields.push(decl),
            None => other.push(decl),
        }
    }

    if !other.is_empty() {
        out.push(GroupedFields {
            label: OTHER_GROUP.to_string(),
            fields: other,
        });
    }
    out
}
