//! pinproxy infrastructure: pinned DNS resolution and hostname-pinned TLS forwarding.
pub mod dns;
pub mod forwarder;
