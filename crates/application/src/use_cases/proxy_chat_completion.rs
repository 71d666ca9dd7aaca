use crate::ports::UpstreamForwarder;
use pinproxy_domain::{ForwardError, RequestDescriptor, UpstreamResponse, UpstreamTarget};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub struct ProxyChatCompletionUseCase {
    forwarder: Arc<dyn UpstreamForwarder>,
    target: UpstreamTarget,
    model: String,
}

impl ProxyChatCompletionUseCase {
    pub fn new(
        forwarder: Arc<dyn UpstreamForwarder>,
        target: UpstreamTarget,
        model: impl Into<String>,
    ) -> Self {
        Self {
            forwarder,
            target,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `messages` is forwarded exactly as the client sent it. Its shape is
    /// not checked here; the upstream rejects what it does not understand.
    pub async fn execute(&self, messages: Value) -> Result<UpstreamResponse, ForwardError> {
        let body = json!({
            "model": self.model,
            "messages": messages,
        });

        debug!(
            upstream = %self.target.name,
            model = %self.model,
            "Proxying chat completion request"
        );

        self.forwarder
            .forward(&self.target, RequestDescriptor::post_json("", body))
            .await
    }
}
