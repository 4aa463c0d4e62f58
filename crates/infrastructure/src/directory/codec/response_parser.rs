use ferrous_discovery_domain::{DiscoveryError, RecordType};
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{Name, RData};
use std::net::Ipv4Addr;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvAnswer {
    pub target: Name,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AAnswer {
    pub host: Name,
    pub address: Ipv4Addr,
}

/// One record from the answer section, discriminated by type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Srv(SrvAnswer),
    A(AAnswer),
    /// Any record type the resolver never asks for.
    Other(String),
}

impl Answer {
    pub fn type_name(&self) -> &str {
        match self {
            Answer::Srv(_) => "SRV",
            Answer::A(_) => "A",
            Answer::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryResponse {
    pub id: u16,
    pub rcode: ResponseCode,
    pub answers: Vec<Answer>,
}

impl DirectoryResponse {
    /// All answers as SRV records; any other type is a protocol error.
    pub fn into_srv(self) -> Result<Vec<SrvAnswer>, DiscoveryError> {
        self.answers
            .into_iter()
            .map(|answer| match answer {
                Answer::Srv(srv) => Ok(srv),
                other => Err(unexpected(RecordType::SRV, &other)),
            })
            .collect()
    }

    /// All answers as A records; any other type is a protocol error.
    pub fn into_a(self) -> Result<Vec<AAnswer>, DiscoveryError> {
        self.answers
            .into_iter()
            .map(|answer| match answer {
                Answer::A(a) => Ok(a),
                other => Err(unexpected(RecordType::A, &other)),
            })
            .collect()
    }
}

fn unexpected(expected: RecordType, found: &Answer) -> DiscoveryError {
    DiscoveryError::UnexpectedRecordType {
        expected,
        found: found.type_name().to_string(),
    }
}

pub struct ResponseParser;

impl ResponseParser {
    /// Decode a DNS message (length prefix already stripped).
    ///
    /// The response code is reported but not acted on: a name the directory
    /// does not know comes back with no answers, which is an empty result.
    pub fn parse(response_bytes: &[u8]) -> Result<DirectoryResponse, DiscoveryError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DiscoveryError::MalformedResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        let id = response_id(response_bytes).unwrap_or_default();
        let rcode = message.response_code();

        let answers: Vec<Answer> = message
            .answers()
            .iter()
            .map(|record| match record.data() {
                RData::SRV(srv) => Answer::Srv(SrvAnswer {
                    target: srv.target().clone(),
                    port: srv.port(),
                    priority: srv.priority(),
                    weight: srv.weight(),
                }),
                RData::A(a) => Answer::A(AAnswer {
                    host: record.name().clone(),
                    address: a.0,
                }),
                _ => Answer::Other(record.record_type().to_string()),
            })
            .collect();

        debug!(
            id,
            rcode = ?rcode,
            answers = answers.len(),
            "Directory response parsed"
        );

        Ok(DirectoryResponse { id, rcode, answers })
    }
}

/// Message ID from the first two bytes of an unframed message.
pub fn response_id(message: &[u8]) -> Option<u16> {
    match message {
        [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}
