use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::RData;
use std::net::IpAddr;
use tracing::debug;

/// The parts of a resolver reply the lookup cares about.
#[derive(Debug, Clone)]
pub struct DnsAnswer {
    pub id: u16,
    pub rcode: ResponseCode,
    pub truncated: bool,
    pub addresses: Vec<IpAddr>,
}

impl DnsAnswer {
    pub fn is_nxdomain(&self) -> bool {
        self.rcode == ResponseCode::NXDomain
    }

    /// The resolver itself could not answer; another one might.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.rcode,
            ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::NotImp
        )
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse(response_bytes: &[u8]) -> Result<DnsAnswer, String> {
        if response_bytes.len() < 12 {
            return Err(format!(
                "response too short: {} bytes",
                response_bytes.len()
            ));
        }
        let id = u16::from_be_bytes([response_bytes[0], response_bytes[1]]);

        let message = Message::from_vec(response_bytes)
            .map_err(|e| format!("failed to parse DNS response: {}", e))?;

        let rcode = message.response_code();
        let truncated = message.truncated();

        // CNAME chains are flattened by the recursive resolver; only the
        // terminal address records matter here.
        let addresses: Vec<IpAddr> = message
            .answers()
            .iter()
            .filter_map(|record| match record.data() {
                RData::A(a) => Some(IpAddr::V4(a.0)),
                RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
                _ => None,
            })
            .collect();

        debug!(
            id = id,
            rcode = ?rcode,
            addresses = addresses.len(),
            truncated = truncated,
            "DNS response parsed"
        );

        Ok(DnsAnswer {
            id,
            rcode,
            truncated,
            addresses,
        })
    }
}
