#![allow(dead_code, unused_imports)]

pub mod dns_server_mock;

pub use dns_server_mock::{MockDnsBehavior, MockDnsServer};
pub use lookup_mocks::{CountingLookup, StaticLookup};
pub use tls_upstream_mock::{MockReply, MockTlsUpstream, RecordedRequest, TestPki};
