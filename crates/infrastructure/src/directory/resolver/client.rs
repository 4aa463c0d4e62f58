use crate::directory::codec::{response_id, DirectoryResponse, FramedQuery, MessageBuilder, ResponseParser};
use crate::directory::transport::{read_with_length_prefix, write_framed, ConnectionPool, PooledConnection};
use ferrous_discovery_application::ports::DiagnosticSink;
use ferrous_discovery_domain::{DiscoveryError, RecordType};
use hickory_proto::rr::Name;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// Sends directory queries over pooled TCP connections with bounded retries.
pub struct DirectoryClient {
    pool: ConnectionPool,
    timeout: Duration,
    max_attempts: u32,
    sink: Arc<dyn DiagnosticSink>,
}

impl DirectoryClient {
    pub fn new(
        address: impl Into<Arc<str>>,
        timeout: Duration,
        max_attempts: u32,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(address, timeout),
            timeout,
            max_attempts,
            sink,
        }
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Query `name` for `record_type`.
    ///
    /// Every attempt starts from a fresh lease and a full write/read cycle.
    /// Failing to obtain a connection aborts immediately; write, read and
    /// deadline failures discard the connection and move to the next
    /// attempt; an undecodable response is returned as-is without retry.
    pub async fn query(
        &self,
        name: &Name,
        record_type: RecordType,
    ) -> Result<DirectoryResponse, DiscoveryError> {
        let query = MessageBuilder::build_query(name, record_type)?;
        let mut last_error: Option<DiscoveryError> = None;

        for attempt in 1..=self.max_attempts {
            let mut connection = self.pool.acquire().await?;

            match self.round_trip(&mut connection, &query).await {
                Ok(bytes) => {
                    let response = ResponseParser::parse(&bytes)?;
                    self.pool.release(connection);

                    debug!(
                        name = %name,
                        record_type = %record_type,
                        attempt,
                        answers = response.answers.len(),
                        "Directory query answered"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    warn!(
                        name = %name,
                        record_type = %record_type,
                        attempt,
                        max_attempts = self.max_attempts,
                        reused = connection.is_reused(),
                        error = %e,
                        "Directory request failed, discarding connection"
                    );
                    self.sink.log(format_args!(
                        "error querying {} {} (attempt {}/{}), {}",
                        record_type, name, attempt, self.max_attempts, e
                    ));
                    self.discard(connection).await;
                    last_error = Some(e);
                }
            }
        }

        Err(DiscoveryError::MaxAttemptsReached {
            attempts: self.max_attempts,
            name: name.to_string(),
            record_type,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no attempt was made".to_string()),
        })
    }

    /// Dial once and park the connection, proving the directory is reachable.
    pub async fn warm_up(&self) -> Result<(), DiscoveryError> {
        let connection = self.pool.acquire().await?;
        self.pool.release(connection);
        Ok(())
    }

    /// Drain the pool and shut down every idle connection.
    pub async fn close(&self) -> usize {
        let streams = self.pool.drain();
        let count = streams.len();

        for mut stream in streams {
            if let Err(e) = stream.shutdown().await {
                self.sink.log(format_args!("error close connection, {}", e));
            }
        }

        count
    }

    async fn round_trip(
        &self,
        connection: &mut PooledConnection,
        query: &FramedQuery,
    ) -> Result<Vec<u8>, DiscoveryError> {
        let server = self.pool.address();
        let stream = connection.stream();

        write_framed(stream, query.as_bytes(), self.timeout, server).await?;
        debug!(server = %server, message_len = query.message().len(), "Directory query sent");

        let response = read_with_length_prefix(stream, self.timeout, server).await?;
        debug!(server = %server, response_len = response.len(), "Directory response received");

        match response_id(&response) {
            Some(received) if received != query.id() => Err(DiscoveryError::ResponseIdMismatch {
                expected: query.id(),
                received,
            }),
            _ => Ok(response),
        }
    }

    async fn discard(&self, connection: PooledConnection) {
        let mut stream = connection.into_stream();
        if let Err(e) = stream.shutdown().await {
            self.sink.log(format_args!("error close connection, {}", e));
        }
    }
}
