#![allow(dead_code)]

use async_trait::async_trait;
use pinproxy_application::ports::UpstreamForwarder;
use pinproxy_domain::{ForwardError, RequestDescriptor, UpstreamResponse, UpstreamTarget};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedForward {
    pub target: UpstreamTarget,
    pub descriptor: RequestDescriptor,
}

#[derive(Clone)]
pub struct MockForwarder {
    calls: Arc<Mutex<Vec<RecordedForward>>>,
    response: Arc<Mutex<Result<UpstreamResponse, ForwardError>>>,
}

impl MockForwarder {
    pub fn returning(response: UpstreamResponse) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: Arc::new(Mutex::new(Ok(response))),
        }
    }

    pub fn failing(error: ForwardError) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: Arc::new(Mutex::new(Err(error))),
        }
    }

    pub fn calls(&self) -> Vec<RecordedForward> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamForwarder for MockForwarder {
    async fn forward(
        &self,
        target: &UpstreamTarget,
        descriptor: RequestDescriptor,
    ) -> Result<UpstreamResponse, ForwardError> {
        self.calls.lock().unwrap().push(RecordedForward {
            target: target.clone(),
            descriptor,
        });
        self.response.lock().unwrap().clone()
    }
}
