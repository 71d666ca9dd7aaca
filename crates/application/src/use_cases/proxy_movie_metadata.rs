use crate::ports::UpstreamForwarder;
use pinproxy_domain::{ForwardError, RequestDescriptor, UpstreamResponse, UpstreamTarget};
use std::sync::Arc;
use tracing::debug;

pub struct ProxyMovieMetadataUseCase {
    forwarder: Arc<dyn UpstreamForwarder>,
    target: UpstreamTarget,
}

impl ProxyMovieMetadataUseCase {
    pub fn new(forwarder: Arc<dyn UpstreamForwarder>, target: UpstreamTarget) -> Self {
        Self { forwarder, target }
    }

    /// `path_suffix` is everything after the route prefix, still
    /// percent-encoded: empty, `/`, or `/movie/550`. It and the query string
    /// are passed through untouched.
    pub async fn execute(
        &self,
        path_suffix: &str,
        query: &str,
    ) -> Result<UpstreamResponse, ForwardError> {
        let descriptor = RequestDescriptor::get(path_suffix, query);

        debug!(
            upstream = %self.target.name,
            path = %descriptor.path_suffix,
            "Proxying movie metadata request"
        );

        self.forwarder.forward(&self.target, descriptor).await
    }
}
