use crate::upstream::{
    UpstreamTarget, CHAT_COMPLETION_HOST, CHAT_COMPLETION_PATH, DEFAULT_CHAT_MODEL, HTTPS_PORT,
    MOVIE_METADATA_BASE_PATH, MOVIE_METADATA_HOST,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    pub hostname: String,

    pub base_path: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Environment variable holding the bearer credential.
    pub credential_env: String,
}

impl UpstreamConfig {
    pub fn into_target(&self, name: &str, credential: impl Into<String>) -> UpstreamTarget {
        UpstreamTarget::new(name, &self.hostname, &self.base_path, credential).with_port(self.port)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamsConfig {
    #[serde(default = "default_movie_metadata")]
    pub movie_metadata: UpstreamConfig,

    #[serde(default = "default_chat_completion")]
    pub chat_completion: UpstreamConfig,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            movie_metadata: default_movie_metadata(),
            chat_completion: default_chat_completion(),
            chat_model: default_chat_model(),
        }
    }
}

fn default_port() -> u16 {
    HTTPS_PORT
}

fn default_movie_metadata() -> UpstreamConfig {
    UpstreamConfig {
        hostname: MOVIE_METADATA_HOST.to_string(),
        base_path: MOVIE_METADATA_BASE_PATH.to_string(),
        port: HTTPS_PORT,
        credential_env: "TMDB_KEY".to_string(),
    }
}

fn default_chat_completion() -> UpstreamConfig {
    UpstreamConfig {
        hostname: CHAT_COMPLETION_HOST.to_string(),
        base_path: CHAT_COMPLETION_PATH.to_string(),
        port: HTTPS_PORT,
        credential_env: "OPENAI_KEY".to_string(),
    }
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}
