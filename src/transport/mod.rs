//! Frame transport
//!
//! One frame travels as exactly one UDP datagram. Endpoints are written as
//! `udp://host:port`; no other scheme is carried.

mod errors;
mod udp;

pub use errors::{TransportError, TransportResult};
pub use udp::{send_frame_async, Endpoint, UdpReceiver, UdpSender, MAX_DATAGRAM_SIZE};
