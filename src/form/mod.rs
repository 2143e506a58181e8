//! Front-end support for sharemap configuration forms
//!
//! Helpers shared by the HTTP API and the CLI:
//! - default values for every declared field
//! - conversion of raw form / JSON input to typed field values
//! - grouping of fields by name prefix for display

mod convert;
mod defaults;
mod groups;

pub use convert::{convert_form_value, convert_json_value, convert_values};
pub use defaults::{default_record, default_values};
pub use groups::{group_fields, group_of, FieldGroup, GroupedFields, OTHER_GROUP};
