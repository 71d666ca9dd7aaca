pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("{0}")]
    Io(String),

    #[error("message of {0} bytes exceeds the transport limit")]
    Oversized(usize),
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError>;

    fn protocol_name(&self) -> &'static str;
}

/// Reads the 16-bit message ID from the first two bytes of a DNS message.
pub(crate) fn message_id(bytes: &[u8]) -> Option<u16> {
    match bytes {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}
