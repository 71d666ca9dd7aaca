pub mod forwarding;
pub mod pinned_lookup;
pub mod resolver_cache;
pub mod transport;

pub use forwarding::{DnsAnswer, MessageBuilder, ResponseParser};
pub use pinned_lookup::PinnedDnsLookup;
pub use resolver_cache::ResolverCache;
