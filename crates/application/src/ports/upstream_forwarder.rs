use async_trait::async_trait;
use pinproxy_domain::{ForwardError, RequestDescriptor, UpstreamResponse, UpstreamTarget};

#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    /// One outbound request/response cycle. No retries.
    async fn forward(
        &self,
        target: &UpstreamTarget,
        descriptor: RequestDescriptor,
    ) -> Result<UpstreamResponse, ForwardError>;
}
