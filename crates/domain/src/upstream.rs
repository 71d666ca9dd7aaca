use crate::request::RequestDescriptor;
use std::fmt;

pub const HTTPS_PORT: u16 = 443;

pub const MOVIE_METADATA_HOST: &str = "api.themoviedb.org";
pub const MOVIE_METADATA_BASE_PATH: &str = "/3";

pub const CHAT_COMPLETION_HOST: &str = "api.openai.com";
pub const CHAT_COMPLETION_PATH: &str = "/v1/chat/completions";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// One of the fixed upstream services the proxy talks to.
///
/// `hostname` is the logical name: it is what gets resolved, what the TLS
/// certificate is verified against and what goes into the `Host` header.
/// The dialed address never replaces it.
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub name: String,
    pub hostname: String,
    pub base_path: String,
    pub port: u16,
    credential: String,
}

impl UpstreamTarget {
    pub fn new(
        name: impl Into<String>,
        hostname: impl Into<String>,
        base_path: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            hostname: hostname.into(),
            base_path: base_path.into(),
            port: HTTPS_PORT,
            credential: credential.into(),
        }
    }

    pub fn movie_metadata(credential: impl Into<String>) -> Self {
        Self::new(
            "movie_metadata",
            MOVIE_METADATA_HOST,
            MOVIE_METADATA_BASE_PATH,
            credential,
        )
    }

    pub fn chat_completion(credential: impl Into<String>) -> Self {
        Self::new(
            "chat_completion",
            CHAT_COMPLETION_HOST,
            CHAT_COMPLETION_PATH,
            credential,
        )
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn has_credential(&self) -> bool {
        !self.credential.is_empty()
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.credential)
    }

    /// Origin-form request target: base path, then the descriptor's suffix,
    /// then `?query` when a query string is present.
    pub fn request_path(&self, descriptor: &RequestDescriptor) -> String {
        let base = if descriptor.path_suffix.starts_with('/') {
            self.base_path.trim_end_matches('/')
        } else {
            self.base_path.as_str()
        };

        let mut path = format!("{}{}", base, descriptor.path_suffix);
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        if !descriptor.query_string.is_empty() {
            path.push('?');
            path.push_str(&descriptor.query_string);
        }
        path
    }
}

impl fmt::Debug for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamTarget")
            .field("name", &self.name)
            .field("hostname", &self.hostname)
            .field("base_path", &self.base_path)
            .field("port", &self.port)
            .field("credential", &"<redacted>")
            .finish()
    }
}
