//! Fixed-size binary codec for sharemap frames
//!
//! A `Codec` is built once per schema table. It owns the table, the computed
//! layout and the version identifier, and converts between `Record` value
//! sets and byte frames of exactly `frame_length()` bytes.
//!
//! The codec is pure: no logging, no I/O, no advisory validation.

#[allow(clippy::module_inception)]
mod codec;
mod errors;
mod layout;
mod value;

pub use codec::{build_codec, Codec};
pub(crate) use codec::{float32_value, integer_value};
pub use errors::{CodecError, CodecResult};
pub use layout::{compute_version_id, FieldLayout, Layout};
pub use value::{FieldValue, Record};
