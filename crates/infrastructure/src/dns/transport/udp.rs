//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! Messages are sent as-is (no framing). If the response has the TC
//! (truncated) bit set, the caller retries over TCP.

use super::{message_id, DnsTransport, TransportError};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    fn bind_addr(&self) -> SocketAddr {
        if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        }
    }

    /// Receives until a datagram from the server carries the query's ID.
    async fn recv_matching(
        &self,
        socket: &UdpSocket,
        expected_id: Option<u16>,
    ) -> Result<Vec<u8>, TransportError> {
        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        loop {
            let (bytes_received, from_addr) = socket.recv_from(&mut recv_buf).await.map_err(|e| {
                TransportError::Io(format!(
                    "failed to receive UDP response from {}: {}",
                    self.server_addr, e
                ))
            })?;

            if from_addr != self.server_addr {
                warn!(
                    expected = %self.server_addr,
                    received_from = %from_addr,
                    "UDP response from unexpected source"
                );
                continue;
            }

            let datagram = &recv_buf[..bytes_received];
            if expected_id.is_some() && message_id(datagram) != expected_id {
                debug!(
                    server = %self.server_addr,
                    "Discarding UDP response with mismatched ID"
                );
                continue;
            }

            return Ok(datagram.to_vec());
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        let socket = UdpSocket::bind(self.bind_addr())
            .await
            .map_err(|e| TransportError::Io(format!("failed to bind UDP socket: {}", e)))?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send_to(message_bytes, self.server_addr))
            .await
            .map_err(|_| TransportError::Timeout(timeout))?
            .map_err(|e| {
                TransportError::Io(format!(
                    "failed to send UDP query to {}: {}",
                    self.server_addr, e
                ))
            })?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        let bytes = tokio::time::timeout(
            timeout,
            self.recv_matching(&socket, message_id(message_bytes)),
        )
        .await
        .map_err(|_| TransportError::Timeout(timeout))??;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "UDP response received"
        );

        Ok(bytes)
    }

    fn protocol_name(&self) -> &'static str {
        "UDP"
    }
}
