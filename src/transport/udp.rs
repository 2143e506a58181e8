//! UDP endpoints, sender and receiver

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use url::Url;

use super::errors::{TransportError, TransportResult};

/// Largest UDP payload over IPv4
pub const MAX_DATAGRAM_SIZE: usize = 65_507;

/// A `udp://host:port` endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parses `udp://host:port`. Host and port are both required.
    pub fn parse(url: &str) -> TransportResult<Self> {
        let parsed = Url::parse(url.trim()).map_err(|e| TransportError::invalid_url(url, e.to_string()))?;
        if parsed.scheme() != "udp" {
            return Err(TransportError::UnsupportedScheme(parsed.scheme().to_string()));
        }
        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| TransportError::invalid_url(url, "missing host"))?;
        let port = parsed
            .port()
            .ok_or_else(|| TransportError::invalid_url(url, "missing port"))?;
        Ok(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, as accepted by socket address resolution
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolves to the first matching socket address
    pub fn resolve(&self) -> TransportResult<SocketAddr> {
        self.authority()
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| TransportError::invalid_url(&self.to_string(), "host did not resolve"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "udp://{}:{}", self.host, self.port)
    }
}

fn unspecified_for(peer: &SocketAddr) -> &'static str {
    if peer.is_ipv4() {
        "0.0.0.0:0"
    } else {
        "[::]:0"
    }
}

fn check_frame_len(frame: &[u8]) -> TransportResult<()> {
    if frame.len() > MAX_DATAGRAM_SIZE {
        return Err(TransportError::FrameTooLarge {
            len: frame.len(),
            max: MAX_DATAGRAM_SIZE,
        });
    }
    Ok(())
}

/// Sends frames to one connected peer
#[derive(Debug)]
pub struct UdpSender {
    socket: UdpSocket,
    peer: SocketAddr,
}

impl UdpSender {
    /// Binds an ephemeral local port and connects it to `endpoint`.
    pub fn connect(endpoint: &Endpoint) -> TransportResult<Self> {
        let peer = endpoint.resolve()?;
        let socket = UdpSocket::bind(unspecified_for(&peer))?;
        socket.connect(peer)?;
        Ok(Self { socket, peer })
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Sends one frame as one datagram, returning the bytes sent.
    pub fn send_frame(&self, frame: &[u8]) -> TransportResult<usize> {
        check_frame_len(frame)?;
        let sent = self.socket.send(frame)?;
        if sent != frame.len() {
            return Err(TransportError::ShortSend {
                sent,
                expected: frame.len(),
            });
        }
        Ok(sent)
    }
}

/// Receives frames on a bound port
#[derive(Debug)]
pub struct UdpReceiver {
    socket: UdpSocket,
    buffer: Vec<u8>,
}

impl UdpReceiver {
    /// Binds to `endpoint`; port 0 picks an ephemeral port.
    pub fn bind(endpoint: &Endpoint) -> TransportResult<Self> {
        let socket = UdpSocket::bind(endpoint.authority())?;
        Ok(Self {
            socket,
            buffer: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    pub fn local_addr(&self) -> TransportResult<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Bounds how long `recv_frame` blocks; None blocks forever.
    pub fn set_timeout(&self, timeout: Option<Duration>) -> TransportResult<()> {
        self.socket.set_read_timeout(timeout)?;
        Ok(())
    }

    /// Blocks for one datagram and returns it with the sender's address.
    ///
    /// The datagram is returned whole regardless of its size; length checks
    /// belong to the codec.
    pub fn recv_frame(&mut self) -> TransportResult<(Vec<u8>, SocketAddr)> {
        let (len, peer) = self.socket.recv_from(&mut self.buffer)?;
        Ok((self.buffer[..len].to_vec(), peer))
    }
}

/// Sends one frame from an ephemeral tokio socket, for async callers.
pub async fn send_frame_async(endpoint: &Endpoint, frame: &[u8]) -> TransportResult<usize> {
    check_frame_len(frame)?;
    let peer = tokio::net::lookup_host(endpoint.authority())
        .await?
        .next()
        .ok_or_else(|| TransportError::invalid_url(&endpoint.to_string(), "host did not resolve"))?;
    let socket = tokio::net::UdpSocket::bind(unspecified_for(&peer)).await?;
    let sent = socket.send_to(frame, peer).await?;
    if sent != frame.len() {
        return Err(TransportError::ShortSend {
            sent,
            expected: frame.len(),
        });
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoint() {
        let endpoint = Endpoint::parse("udp://localhost:5000").unwrap();
        assert_eq!(endpoint.host(), "localhost");
        assert_eq!(endpoint.port(), 5000);
        assert_eq!(endpoint.to_string(), "udp://localhost:5000");
        assert_eq!(endpoint.authority(), "localhost:5000");
    }

    #[test]
    fn test_parse_rejects_other_schemes() {
        let err = Endpoint::parse("tcp://127.0.0.1:5555").unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedScheme(ref s) if s == "tcp"));
        assert_eq!(err.code(), "SHAREMAP_UNSUPPORTED_SCHEME");
    }

    #[test]
    fn test_parse_requires_port_and_host() {
        assert_eq!(Endpoint::parse("udp://localhost").unwrap_err().code(), "SHAREMAP_INVALID_URL");
        assert_eq!(Endpoint::parse("not a url").unwrap_err().code(), "SHAREMAP_INVALID_URL");
    }

    #[test]
    fn test_loopback_datagram() {
        let mut receiver = UdpReceiver::bind(&Endpoint::new("127.0.0.1", 0)).unwrap();
        receiver.set_timeout(Some(Duration::from_secs(5))).unwrap();
        let port = receiver.local_addr().unwrap().port();

        let sender = UdpSender::connect(&Endpoint::new("127.0.0.1", port)).unwrap();
        assert_eq!(sender.send_frame(&[1, 2, 3]).unwrap(), 3);

        let (frame, peer) = receiver.recv_frame().unwrap();
        assert_eq!(frame, vec![1, 2, 3]);
        assert!(peer.ip().is_loopback());
    }

    #[test]
    fn test_oversized_frame_rejected() {
        let receiver = UdpReceiver::bind(&Endpoint::new("127.0.0.1", 0)).unwrap();
        let port = receiver.local_addr().unwrap().port();
        let sender = UdpSender::connect(&Endpoint::new("127.0.0.1", port)).unwrap();
        let err = sender.send_frame(&vec![0u8; MAX_DATAGRAM_SIZE + 1]).unwrap_err();
        assert_eq!(err.code(), "SHAREMAP_FRAME_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_async_send() {
        let mut receiver = UdpReceiver::bind(&Endpoint::new("127.0.0.1", 0)).unwrap();
        receiver.set_timeout(Some(Duration::from_secs(5))).unwrap();
        let port = receiver.local_addr().unwrap().port();

        let sent = send_frame_async(&Endpoint::new("127.0.0.1", port), b"frame").await.unwrap();
        assert_eq!(sent, 5);
        let (frame, _) = receiver.recv_frame().unwrap();
        assert_eq!(frame, b"frame");
    }
}
