use async_trait::async_trait;
use pinproxy_domain::ResolutionError;
use std::net::IpAddr;

/// Turns a hostname into the single address that will be dialed.
#[async_trait]
pub trait HostLookup: Send + Sync {
    async fn lookup(&self, hostname: &str) -> Result<IpAddr, ResolutionError>;
}
