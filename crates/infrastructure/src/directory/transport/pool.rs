use ferrous_discovery_domain::DiscoveryError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::{debug, info};

/// Idle TCP connections to a single directory address.
///
/// A connection is either leased to exactly one caller (as a
/// [`PooledConnection`], moved out of the pool) or sitting idle here.
/// Leases come back only through [`ConnectionPool::release`], which callers
/// invoke after a complete request/response cycle; a lease that hit an I/O
/// error is dropped instead, closing the socket.
pub struct ConnectionPool {
    address: Arc<str>,
    connect_timeout: Duration,
    idle: Mutex<Vec<TcpStream>>,
    total_dialed: AtomicU64,
    total_reused: AtomicU64,
}

impl ConnectionPool {
    pub fn new(address: impl Into<Arc<str>>, connect_timeout: Duration) -> Self {
        let address = address.into();
        info!(address = %address, timeout_ms = connect_timeout.as_millis() as u64, "Initializing directory connection pool");

        Self {
            address,
            connect_timeout,
            idle: Mutex::new(Vec::new()),
            total_dialed: AtomicU64::new(0),
            total_reused: AtomicU64::new(0),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Pop an idle connection, or dial a new one within the connect timeout.
    ///
    /// Idle connections are not probed before reuse; a stale one fails on
    /// its first write or read and is discarded by the caller.
    pub async fn acquire(&self) -> Result<PooledConnection, DiscoveryError> {
        if let Some(stream) = self.pop_idle() {
            self.total_reused.fetch_add(1, Ordering::Relaxed);
            debug!(server = %self.address, "Reusing pooled directory connection");
            return Ok(PooledConnection {
                stream,
                reused: true,
            });
        }

        let stream = self.connect_new().await?;
        self.total_dialed.fetch_add(1, Ordering::Relaxed);
        debug!(server = %self.address, "Dialed new directory connection");

        Ok(PooledConnection {
            stream,
            reused: false,
        })
    }

    pub fn release(&self, connection: PooledConnection) {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        idle.push(connection.stream);
        debug!(server = %self.address, pool_size = idle.len(), "Returned connection to pool");
    }

    /// Remove every idle connection, handing ownership to the caller.
    pub fn drain(&self) -> Vec<TcpStream> {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *idle)
    }

    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            total_dialed: self.total_dialed.load(Ordering::Relaxed),
            total_reused: self.total_reused.load(Ordering::Relaxed),
            idle: self.idle_count(),
        }
    }

    fn pop_idle(&self) -> Option<TcpStream> {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).pop()
    }

    async fn connect_new(&self) -> Result<TcpStream, DiscoveryError> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(&*self.address))
            .await
            .map_err(|_| DiscoveryError::ConnectTimeout {
                server: self.address.to_string(),
            })?
            .map_err(|e| DiscoveryError::ConnectFailed {
                server: self.address.to_string(),
                reason: e.to_string(),
            })?;

        stream
            .set_nodelay(true)
            .map_err(|e| DiscoveryError::ConnectFailed {
                server: self.address.to_string(),
                reason: format!("Failed to set TCP_NODELAY: {}", e),
            })?;

        Ok(stream)
    }
}

/// A connection leased from a [`ConnectionPool`].
#[derive(Debug)]
pub struct PooledConnection {
    stream: TcpStream,
    reused: bool,
}

impl PooledConnection {
    pub fn stream(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Whether this lease came from the idle list rather than a fresh dial.
    pub fn is_reused(&self) -> bool {
        self.reused
    }

    pub fn into_stream(self) -> TcpStream {
        self.stream
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub total_dialed: u64,
    pub total_reused: u64,
    pub idle: usize,
}

impl PoolStats {
    pub fn reuse_rate(&self) -> f64 {
        let total = self.total_dialed + self.total_reused;
        if total == 0 {
            0.0
        } else {
            self.total_reused as f64 / total as f64
        }
    }
}
