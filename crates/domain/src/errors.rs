use thiserror::Error;

use crate::RecordType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Invalid service name: {0}")]
    InvalidServiceName(String),

    #[error("Invalid resolver configuration: {0}")]
    InvalidConfig(String),

    #[error("Timeout connecting to directory {server}")]
    ConnectTimeout { server: String },

    #[error("Failed to connect to directory {server}: {reason}")]
    ConnectFailed { server: String, reason: String },

    #[error("Timeout during {operation} on connection to {server}")]
    TransportTimeout {
        server: String,
        operation: &'static str,
    },

    #[error("Transport error on connection to {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("Response ID {received} does not match query ID {expected}")]
    ResponseIdMismatch { expected: u16, received: u16 },

    #[error("Failed to encode query: {0}")]
    QueryEncoding(String),

    #[error("Malformed directory response: {0}")]
    MalformedResponse(String),

    #[error("Expected {expected} record, got {found}")]
    UnexpectedRecordType {
        expected: RecordType,
        found: String,
    },

    #[error("Invalid embedded address in target {0}")]
    InvalidEmbeddedAddress(String),

    #[error("No address found for host {host}")]
    MissingAddress { host: String },

    #[error("Max attempts reached ({attempts}) for {record_type} {name}: {last_error}")]
    MaxAttemptsReached {
        attempts: u32,
        name: String,
        record_type: RecordType,
        last_error: String,
    },
}

impl DiscoveryError {
    /// Raised before any network activity, while composing the resolver.
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::InvalidServiceName(_) | Self::InvalidConfig(_))
    }

    /// The directory could not be reached at all. Not retried.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::ConnectTimeout { .. } | Self::ConnectFailed { .. })
    }

    /// Failure on an otherwise valid connection. The connection is discarded
    /// and the request retried on another one.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::TransportTimeout { .. } | Self::Transport { .. } | Self::ResponseIdMismatch { .. }
        )
    }

    /// The directory answered, but the answer is unusable. Never retried.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse(_)
                | Self::UnexpectedRecordType { .. }
                | Self::InvalidEmbeddedAddress(_)
                | Self::MissingAddress { .. }
        )
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::MaxAttemptsReached { .. })
    }
}
