use serde::{Deserialize, Serialize};

use super::errors::ConfigError;
use super::forwarder::ForwarderConfig;
use super::logging::LoggingConfig;
use super::resolver::ResolverConfig;
use super::server::ServerConfig;
use super::upstreams::{UpstreamConfig, UpstreamsConfig};

const LOCAL_CONFIG_PATH: &str = "pinproxy.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/pinproxy/config.toml";

/// Main configuration structure for pinproxy
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Inbound HTTP listener
    #[serde(default)]
    pub server: ServerConfig,

    /// Pinned DNS resolvers
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Outbound connection limits and trust
    #[serde(default)]
    pub forwarder: ForwarderConfig,

    /// The two proxied services
    #[serde(default)]
    pub upstreams: UpstreamsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. pinproxy.toml in current directory
    /// 3. /etc/pinproxy/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path.map(str::to_string).or_else(Self::get_config_path) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("Server port cannot be 0".to_string()));
        }

        match self.resolver.servers.len() {
            1 | 2 => {}
            0 => {
                return Err(ConfigError::Validation(
                    "No resolver servers configured".to_string(),
                ))
            }
            n => {
                return Err(ConfigError::Validation(format!(
                    "At most two resolver servers are supported, got {}",
                    n
                )))
            }
        }
        self.resolver.socket_addrs()?;

        if self.resolver.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Resolver query timeout cannot be 0".to_string(),
            ));
        }

        validate_upstream("movie_metadata", &self.upstreams.movie_metadata)?;
        validate_upstream("chat_completion", &self.upstreams.chat_completion)?;

        if self.upstreams.chat_model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Chat completion model cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|path| std::path::Path::new(path).exists())
            .map(str::to_string)
    }
}

fn validate_upstream(name: &str, upstream: &UpstreamConfig) -> Result<(), ConfigError> {
    if upstream.hostname.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "Upstream '{}' has no hostname",
            name
        )));
    }
    if upstream.hostname.parse::<std::net::IpAddr>().is_ok() {
        return Err(ConfigError::Validation(format!(
            "Upstream '{}' hostname must be a name, not an IP literal",
            name
        )));
    }
    if !upstream.base_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "Upstream '{}' base_path must start with '/'",
            name
        )));
    }
    if upstream.port == 0 {
        return Err(ConfigError::Validation(format!(
            "Upstream '{}' port cannot be 0",
            name
        )));
    }
    if upstream.credential_env.trim().is_empty() {
        return Err(ConfigError::Validation(format!(
            "Upstream '{}' has no credential_env",
            name
        )));
    }
    Ok(())
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
}
