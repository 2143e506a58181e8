//! Observability for the sharemap tools
//!
//! Structured JSON logging only: one line per event, deterministic key
//! order, synchronous writes.
//!
//! ```ignore
//! use sharemap::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::FrameSent, &[("bytes", "22"), ("peer", "localhost:5000")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a sharemap event at its own severity
pub fn log_event(event: Event) {
    Logger::log(event.severity(), event.as_str(), &[]);
}

/// Log a sharemap event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
