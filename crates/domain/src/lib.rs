//! pinproxy domain layer
pub mod config;
pub mod errors;
pub mod request;
pub mod upstream;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::{ForwardError, ForwardErrorKind, ResolutionError};
pub use request::{HttpMethod, RequestDescriptor, UpstreamResponse};
pub use upstream::{UpstreamTarget, DEFAULT_CHAT_MODEL};
