use async_trait::async_trait;
use ferrous_discovery_domain::{DiscoveryError, Endpoint};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The cache was replaced with a freshly resolved list.
    Refreshed { endpoints: usize },

    /// Another refresh was already running; the cache was left untouched.
    Skipped,
}

impl UpdateOutcome {
    pub fn is_refreshed(&self) -> bool {
        matches!(self, Self::Refreshed { .. })
    }
}

#[async_trait]
pub trait EndpointResolver: Send + Sync {
    /// Re-resolve the service and replace the cached endpoint list.
    async fn update(&self) -> Result<UpdateOutcome, DiscoveryError>;

    /// Current cache generation. Later refreshes replace it rather than
    /// mutating it, so the returned snapshot stays valid.
    fn all(&self) -> Arc<[Endpoint]>;

    fn random(&self) -> Option<Endpoint>;

    fn next(&self) -> Option<Endpoint>;

    /// Drain and close every idle connection.
    async fn close(&self);
}
