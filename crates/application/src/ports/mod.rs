mod host_lookup;
mod upstream_forwarder;

pub use host_lookup::HostLookup;
pub use upstream_forwarder::UpstreamForwarder;
