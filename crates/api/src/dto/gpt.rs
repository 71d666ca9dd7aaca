use serde::Deserialize;
use serde_json::Value;

/// Body of `POST /api/gpt`. `messages` is forwarded without inspection.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Value,
}
