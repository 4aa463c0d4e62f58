//! Directory query construction
//!
//! Builds single-question DNS queries in wire format using `hickory-proto`
//! and frames them for a TCP stream (RFC 1035 §4.2.2 length prefix).

use super::record_type_map::RecordTypeMapper;
use ferrous_discovery_domain::{DiscoveryError, RecordType};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

const LENGTH_PREFIX_LEN: usize = 2;

/// A query ready to be written to a stream: 2-byte big-endian length
/// followed by the DNS message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedQuery {
    id: u16,
    bytes: Vec<u8>,
}

impl FramedQuery {
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Prefix and message, as sent on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The DNS message without its length prefix.
    pub fn message(&self) -> &[u8] {
        &self.bytes[LENGTH_PREFIX_LEN..]
    }
}

pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a framed query for `name` with a random ID and class IN.
    pub fn build_query(name: &Name, record_type: RecordType) -> Result<FramedQuery, DiscoveryError> {
        let mut query = Query::new();
        query.set_name(name.clone());
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);
        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.add_query(query);

        let bytes = Self::serialize_framed(&message)?;
        Ok(FramedQuery { id, bytes })
    }

    fn serialize_framed(message: &Message) -> Result<Vec<u8>, DiscoveryError> {
        let mut message_buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut message_buf);
        message
            .emit(&mut encoder)
            .map_err(|e| DiscoveryError::QueryEncoding(e.to_string()))?;

        let prefix = u16::try_from(message_buf.len()).map_err(|_| {
            DiscoveryError::QueryEncoding(format!(
                "Query of {} bytes does not fit a TCP frame",
                message_buf.len()
            ))
        })?;

        let mut framed = Vec::with_capacity(LENGTH_PREFIX_LEN + message_buf.len());
        framed.extend_from_slice(&prefix.to_be_bytes());
        framed.extend_from_slice(&message_buf);
        Ok(framed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn name(s: &str) -> Name {
        Name::from_str(s).unwrap()
    }

    #[test]
    fn test_prefix_matches_message_length() {
        let query = MessageBuilder::build_query(&name("foo.service.dc1.consul."), RecordType::SRV)
            .unwrap();

        let bytes = query.as_bytes();
        let declared = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
        assert_eq!(declared, bytes.len() - 2);
        assert_eq!(query.message().len(), declared);
    }

    #[test]
    fn test_header_carries_id_and_one_question() {
        let query =
            MessageBuilder::build_query(&name("web.service.dc1.consul."), RecordType::A).unwrap();

        let msg = query.message();
        assert_eq!(u16::from_be_bytes([msg[0], msg[1]]), query.id());
        assert_eq!(msg[2] & 0x80, 0, "QR bit must be clear on a query");
        assert_eq!(u16::from_be_bytes([msg[4], msg[5]]), 1, "QDCOUNT");
        assert_eq!(u16::from_be_bytes([msg[6], msg[7]]), 0, "ANCOUNT");
    }

    #[test]
    fn test_question_type_and_class() {
        let query =
            MessageBuilder::build_query(&name("foo.service.dc1.consul."), RecordType::SRV).unwrap();

        let parsed = Message::from_vec(query.message()).unwrap();
        let question = &parsed.queries()[0];
        assert_eq!(question.name(), &name("foo.service.dc1.consul."));
        assert_eq!(question.query_type(), hickory_proto::rr::RecordType::SRV);
        assert_eq!(question.query_class(), DNSClass::IN);
    }

    #[test]
    fn test_ids_vary_between_queries() {
        let target = name("foo.service.dc1.consul.");
        let ids: std::collections::HashSet<u16> = (0..32)
            .map(|_| MessageBuilder::build_query(&target, RecordType::SRV).unwrap().id())
            .collect();
        assert!(ids.len() > 1);
    }
}
