pub mod errors;
pub mod forwarder;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod server;
pub mod upstreams;

pub use errors::ConfigError;
pub use forwarder::ForwarderConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use resolver::ResolverConfig;
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstreams::{UpstreamConfig, UpstreamsConfig};
