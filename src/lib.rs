//! sharemap - schema-driven fixed-size binary frames
//!
//! A declarative field schema becomes an ordered field table, a fixed byte
//! layout and a 64-bit version identifier. Configuration and telemetry
//! records are packed into frames of exactly that layout and unpacked on
//! the other side, where size and version are checked before anything is
//! trusted.
//!
//! - `schema`: field registry, table building, advisory validation
//! - `codec`: layout, version id, pack / unpack
//! - `form`: defaults, input conversion, display groups
//! - `codegen`: C++ header over the same layout
//! - `transport`: one frame per UDP datagram
//! - `http_server`: configuration API
//! - `cli`: the `sharemap` binary

pub mod cli;
pub mod codec;
pub mod codegen;
pub mod form;
pub mod http_server;
pub mod observability;
pub mod schema;
pub mod transport;
