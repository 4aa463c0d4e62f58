use ferrous_discovery_domain::Endpoint;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Generation-swapped endpoint list with random and round-robin selection.
///
/// Each refresh installs a new `Arc<[Endpoint]>`; the previous generation is
/// never written to, so snapshots handed out by [`EndpointCache::all`] stay
/// consistent for as long as the caller holds them.
pub struct EndpointCache {
    endpoints: RwLock<Arc<[Endpoint]>>,
    counter: AtomicU64,
}

impl EndpointCache {
    pub fn new() -> Self {
        Self {
            endpoints: RwLock::new(Arc::from(Vec::new())),
            counter: AtomicU64::new(0),
        }
    }

    pub fn all(&self) -> Arc<[Endpoint]> {
        let guard = self.endpoints.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    pub fn random(&self) -> Option<Endpoint> {
        let guard = self.endpoints.read().unwrap_or_else(|e| e.into_inner());
        if guard.is_empty() {
            return None;
        }

        Some(guard[fastrand::usize(..guard.len())])
    }

    /// Round-robin pick. The length check, the counter increment and the
    /// indexing all happen under one read guard, so the index is always
    /// computed against the generation it is applied to.
    pub fn next(&self) -> Option<Endpoint> {
        let guard = self.endpoints.read().unwrap_or_else(|e| e.into_inner());
        if guard.is_empty() {
            return None;
        }

        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        Some(guard[(n % guard.len() as u64) as usize])
    }

    pub fn replace(&self, endpoints: Vec<Endpoint>) {
        let generation: Arc<[Endpoint]> = Arc::from(endpoints);
        let len = generation.len();

        let mut guard = self.endpoints.write().unwrap_or_else(|e| e.into_inner());
        *guard = generation;
        drop(guard);

        debug!(endpoints = len, "Endpoint cache replaced");
    }

    pub fn len(&self) -> usize {
        self.endpoints
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EndpointCache {
    fn default() -> Self {
        Self::new()
    }
}
