use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// What one inbound request asks to be sent upstream.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path_suffix: String,
    pub query_string: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    pub fn get(path_suffix: impl Into<String>, query_string: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path_suffix: path_suffix.into(),
            query_string: query_string.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post_json(path_suffix: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            path_suffix: path_suffix.into(),
            query_string: String::new(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Parsed upstream reply, passed back to the client as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Value,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
