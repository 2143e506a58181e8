//! CLI module for sharemap
//!
//! Provides command-line interface for:
//! - send: pack a values file and send one frame
//! - grab: receive one frame and print it as JSON
//! - receive: print every received frame until stopped
//! - gen: generate the C++ header
//! - inspect: print a section's frame layout
//! - serve: run the HTTP configuration API

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{generate, grab, inspect, load_codec, load_values, receive, run, run_command, send, serve};
pub use errors::{CliError, CliResult};
pub use io::{format_timestamp, format_value, render_frame, render_layout, write_json, write_text};
