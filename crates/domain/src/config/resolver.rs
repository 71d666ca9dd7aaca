use super::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// The pinned recursive resolvers. Only these addresses are ever queried.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Collapse concurrent misses for the same hostname into one query.
    #[serde(default = "default_true")]
    pub deduplicate_inflight: bool,
}

impl ResolverConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Parses `servers`; a bare IP gets port 53.
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.servers
            .iter()
            .map(|server| parse_server(server))
            .collect()
    }
}

fn parse_server(server: &str) -> Result<SocketAddr, ConfigError> {
    if let Ok(addr) = server.parse::<SocketAddr>() {
        return Ok(addr);
    }
    server
        .parse::<std::net::IpAddr>()
        .map(|ip| SocketAddr::new(ip, 53))
        .map_err(|_| ConfigError::Validation(format!("Invalid resolver address: {}", server)))
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            servers: default_servers(),
            query_timeout_ms: default_query_timeout_ms(),
            deduplicate_inflight: default_true(),
        }
    }
}

fn default_servers() -> Vec<String> {
    vec!["1.1.1.1:53".to_string(), "1.0.0.1:53".to_string()]
}

fn default_query_timeout_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}
