use ferrous_discovery_domain::DiscoveryError;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Write an already length-prefixed message, bounded by `timeout`.
pub async fn write_framed<S>(
    stream: &mut S,
    framed: &[u8],
    timeout: Duration,
    server: &str,
) -> Result<(), DiscoveryError>
where
    S: AsyncWriteExt + Unpin,
{
    tokio::time::timeout(timeout, async {
        stream.write_all(framed).await?;
        stream.flush().await
    })
    .await
    .map_err(|_| DiscoveryError::TransportTimeout {
        server: server.to_string(),
        operation: "write",
    })?
    .map_err(|e| DiscoveryError::Transport {
        server: server.to_string(),
        reason: format!("Failed to write query: {}", e),
    })
}

/// Read one length-prefixed message and return it without the prefix.
///
/// The prefix and the body are each read under a fresh `timeout`, and the
/// body read loops until exactly the declared number of bytes arrived.
pub async fn read_with_length_prefix<S>(
    stream: &mut S,
    timeout: Duration,
    server: &str,
) -> Result<Vec<u8>, DiscoveryError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    read_exact_within(stream, &mut len_buf, timeout, server, "read length").await?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    let mut response = vec![0u8; response_len];
    read_exact_within(stream, &mut response, timeout, server, "read body").await?;

    Ok(response)
}

async fn read_exact_within<S>(
    stream: &mut S,
    buf: &mut [u8],
    timeout: Duration,
    server: &str,
    operation: &'static str,
) -> Result<(), DiscoveryError>
where
    S: AsyncReadExt + Unpin,
{
    tokio::time::timeout(timeout, stream.read_exact(buf))
        .await
        .map_err(|_| DiscoveryError::TransportTimeout {
            server: server.to_string(),
            operation,
        })?
        .map(|_| ())
        .map_err(|e| DiscoveryError::Transport {
            server: server.to_string(),
            reason: format!("Failed to {}: {}", operation, e),
        })
}
