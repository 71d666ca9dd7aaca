use super::forwarding::{DnsAnswer, MessageBuilder, ResponseParser};
use super::transport::tcp::TcpTransport;
use super::transport::udp::UdpTransport;
use super::transport::{DnsTransport, TransportError};
use async_trait::async_trait;
use hickory_proto::rr::RecordType;
use pinproxy_application::ports::HostLookup;
use pinproxy_domain::ResolutionError;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves hostnames against a fixed list of recursive resolvers, never the
/// host's own resolver configuration.
///
/// Servers are tried in order. A server that times out, fails at the
/// transport level, or answers SERVFAIL/REFUSED hands over to the next one;
/// an authoritative "no such name" or an empty answer ends the lookup.
pub struct PinnedDnsLookup {
    servers: Vec<SocketAddr>,
    timeout: Duration,
}

impl PinnedDnsLookup {
    pub fn new(servers: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self { servers, timeout }
    }

    async fn lookup_on(
        &self,
        server: SocketAddr,
        hostname: &str,
    ) -> Result<IpAddr, ResolutionError> {
        for record_type in [RecordType::A, RecordType::AAAA] {
            let answer = self.query(server, hostname, record_type).await?;

            if answer.is_server_error() {
                return Err(ResolutionError::Transport {
                    server: server.to_string(),
                    hostname: hostname.to_string(),
                    reason: format!("resolver answered {}", answer.rcode),
                });
            }
            if answer.is_nxdomain() {
                return Err(ResolutionError::NoAddress {
                    hostname: hostname.to_string(),
                });
            }
            if let Some(ip) = answer.addresses.first() {
                debug!(
                    server = %server,
                    hostname = %hostname,
                    record_type = %record_type,
                    ip = %ip,
                    "Resolved"
                );
                return Ok(*ip);
            }
        }

        Err(ResolutionError::NoAddress {
            hostname: hostname.to_string(),
        })
    }

    async fn query(
        &self,
        server: SocketAddr,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<DnsAnswer, ResolutionError> {
        let (id, query_bytes) = MessageBuilder::build_query(hostname, record_type)?;

        let udp = UdpTransport::new(server);
        let answer = self.exchange(&udp, server, hostname, id, &query_bytes).await?;
        if !answer.truncated {
            return Ok(answer);
        }

        debug!(
            server = %server,
            hostname = %hostname,
            id = id,
            "UDP answer truncated, retrying over TCP"
        );
        let tcp = TcpTransport::new(server);
        self.exchange(&tcp, server, hostname, id, &query_bytes).await
    }

    async fn exchange(
        &self,
        transport: &dyn DnsTransport,
        server: SocketAddr,
        hostname: &str,
        id: u16,
        query_bytes: &[u8],
    ) -> Result<DnsAnswer, ResolutionError> {
        let response = transport
            .send(query_bytes, self.timeout)
            .await
            .map_err(|e| match e {
                TransportError::Timeout(_) => ResolutionError::Timeout {
                    server: server.to_string(),
                    hostname: hostname.to_string(),
                },
                other => ResolutionError::Transport {
                    server: server.to_string(),
                    hostname: hostname.to_string(),
                    reason: format!("{} ({})", other, transport.protocol_name()),
                },
            })?;

        let malformed = |reason: String| ResolutionError::MalformedAnswer {
            server: server.to_string(),
            hostname: hostname.to_string(),
            reason,
        };

        let answer = ResponseParser::parse(&response).map_err(malformed)?;
        if answer.id != id {
            return Err(malformed(format!(
                "{} answer ID {} does not match query ID {}",
                transport.protocol_name(),
                answer.id,
                id
            )));
        }
        Ok(answer)
    }
}

#[async_trait]
impl HostLookup for PinnedDnsLookup {
    async fn lookup(&self, hostname: &str) -> Result<IpAddr, ResolutionError> {
        if self.servers.is_empty() {
            return Err(ResolutionError::NoServers);
        }

        for (position, server) in self.servers.iter().enumerate() {
            match self.lookup_on(*server, hostname).await {
                Ok(ip) => return Ok(ip),
                Err(e) if e.is_server_failure() => {
                    warn!(server = %server, error = %e, position = position, "Failing over");
                }
                Err(e) => return Err(e),
            }
        }

        Err(ResolutionError::AllServersFailed {
            hostname: hostname.to_string(),
        })
    }
}
