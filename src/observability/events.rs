//! Observable sharemap events

use std::fmt;

use super::logger::Severity;

/// Events emitted by the sharemap tools.
///
/// The codec itself emits nothing; these come from the CLI and HTTP layers
/// around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Frame packed and sent as one datagram
    FrameSent,
    /// Datagram received and decoded
    FrameReceived,
    /// Datagram received but rejected by unpack
    UnpackFailed,
    /// C++ header written
    HeaderGenerated,
    /// HTTP API listening
    ServerStart,
    /// Configuration accepted by the HTTP API and sent
    ConfigSent,
    /// Configuration rejected by the HTTP API
    ConfigRejected,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::FrameSent => "SHAREMAP_FRAME_SENT",
            Event::FrameReceived => "SHAREMAP_FRAME_RECEIVED",
            Event::UnpackFailed => "SHAREMAP_UNPACK_FAILED",
            Event::HeaderGenerated => "SHAREMAP_HEADER_GENERATED",
            Event::ServerStart => "SHAREMAP_SERVER_START",
            Event::ConfigSent => "SHAREMAP_CONFIG_SENT",
            Event::ConfigRejected => "SHAREMAP_CONFIG_REJECTED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::UnpackFailed | Event::ConfigRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_prefixed() {
        let all = [
            Event::FrameSent,
            Event::FrameReceived,
            Event::UnpackFailed,
            Event::HeaderGenerated,
            Event::ServerStart,
            Event::ConfigSent,
            Event::ConfigRejected,
        ];
        for event in all {
            assert!(event.as_str().starts_with("SHAREMAP_"));
        }
        assert_eq!(Event::UnpackFailed.severity(), Severity::Warn);
        assert_eq!(Event::FrameSent.to_string(), "SHAREMAP_FRAME_SENT");
    }
}
