//! DNS Message Builder
//!
//! Constructs recursive A/AAAA queries in wire format using `hickory-proto`.

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use pinproxy_domain::ResolutionError;
use std::str::FromStr;

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a recursive query for `hostname` and return its ID with the bytes.
    ///
    /// The ID is random; callers match it against the reply to drop stray
    /// datagrams.
    pub fn build_query(
        hostname: &str,
        record_type: RecordType,
    ) -> Result<(u16, Vec<u8>), ResolutionError> {
        let name = Name::from_str(hostname).map_err(|e| ResolutionError::InvalidHostname {
            hostname: hostname.to_string(),
            reason: e.to_string(),
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(record_type);
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        message
            .emit(&mut encoder)
            .map_err(|e| ResolutionError::InvalidHostname {
                hostname: hostname.to_string(),
                reason: format!("failed to serialize query: {}", e),
            })?;

        Ok((id, buf))
    }
}
