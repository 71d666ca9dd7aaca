use std::fmt;
use thiserror::Error;

/// Failure to turn a hostname into an address through the pinned resolvers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("Invalid hostname '{hostname}': {reason}")]
    InvalidHostname { hostname: String, reason: String },

    #[error("Timeout querying resolver {server} for {hostname}")]
    Timeout { server: String, hostname: String },

    #[error("Resolver {server} failed for {hostname}: {reason}")]
    Transport {
        server: String,
        hostname: String,
        reason: String,
    },

    #[error("Resolver {server} returned a malformed answer for {hostname}: {reason}")]
    MalformedAnswer {
        server: String,
        hostname: String,
        reason: String,
    },

    #[error("No address records found for {hostname}")]
    NoAddress { hostname: String },

    #[error("All pinned resolvers failed for {hostname}")]
    AllServersFailed { hostname: String },

    #[error("No resolver servers configured")]
    NoServers,
}

impl ResolutionError {
    pub fn hostname(&self) -> Option<&str> {
        match self {
            Self::InvalidHostname { hostname, .. }
            | Self::Timeout { hostname, .. }
            | Self::Transport { hostname, .. }
            | Self::MalformedAnswer { hostname, .. }
            | Self::NoAddress { hostname }
            | Self::AllServersFailed { hostname } => Some(hostname),
            Self::NoServers => None,
        }
    }

    /// Whether another pinned server might answer where this one did not.
    pub fn is_server_failure(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Transport { .. } | Self::MalformedAnswer { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForwardErrorKind {
    UpstreamUnreachable,
    TransportFailure,
    MalformedUpstreamResponse,
}

impl ForwardErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamUnreachable => "upstream_unreachable",
            Self::TransportFailure => "transport_failure",
            Self::MalformedUpstreamResponse => "malformed_upstream_response",
        }
    }
}

impl fmt::Display for ForwardErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single forward attempt. `cause` is for operators only and
/// must never be echoed back to the inbound client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {cause}")]
pub struct ForwardError {
    pub kind: ForwardErrorKind,
    pub cause: String,
}

impl ForwardError {
    pub fn new(kind: ForwardErrorKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }

    pub fn upstream_unreachable(cause: impl Into<String>) -> Self {
        Self::new(ForwardErrorKind::UpstreamUnreachable, cause)
    }

    pub fn transport(cause: impl Into<String>) -> Self {
        Self::new(ForwardErrorKind::TransportFailure, cause)
    }

    pub fn malformed_response(cause: impl Into<String>) -> Self {
        Self::new(ForwardErrorKind::MalformedUpstreamResponse, cause)
    }
}

impl From<ResolutionError> for ForwardError {
    fn from(err: ResolutionError) -> Self {
        Self::upstream_unreachable(err.to_string())
    }
}
