use super::builder::ConsulResolverBuilder;
use super::client::DirectoryClient;
use crate::directory::codec::{decode_embedded_address, SrvAnswer};
use async_trait::async_trait;
use ferrous_discovery_application::ports::{EndpointResolver, UpdateOutcome};
use ferrous_discovery_application::services::{EndpointCache, RefreshGuard};
use ferrous_discovery_domain::{
    AddressMode, DiscoveryError, Endpoint, RecordType, ResolverConfig, ServiceQuery,
};
use hickory_proto::rr::Name;
use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info};

/// Resolves one service through a Consul-style DNS directory and keeps the
/// last good endpoint list for selection.
///
/// Refreshes are explicit ([`ConsulResolver::update`]) and single-flight; the
/// selection methods never block on a refresh.
pub struct ConsulResolver {
    query: ServiceQuery,
    question: Name,
    config: ResolverConfig,
    client: DirectoryClient,
    cache: EndpointCache,
    refresh_guard: RefreshGuard,
}

impl ConsulResolver {
    pub fn builder(service: impl Into<String>) -> ConsulResolverBuilder {
        ConsulResolverBuilder::new(service)
    }

    pub(super) fn from_parts(
        query: ServiceQuery,
        question: Name,
        config: ResolverConfig,
        client: DirectoryClient,
    ) -> Self {
        info!(
            service = query.service(),
            query_name = query.name(),
            directory = %config.address,
            mode = %config.address_mode,
            timeout_ms = config.timeout_ms,
            max_attempts = config.max_attempts,
            "Directory resolver created"
        );

        Self {
            query,
            question,
            config,
            client,
            cache: EndpointCache::new(),
            refresh_guard: RefreshGuard::new(),
        }
    }

    /// Canonical question, `<service>.service.<datacenter>.<domain>.`
    pub fn query_name(&self) -> &str {
        self.query.name()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn idle_connections(&self) -> usize {
        self.client.pool().idle_count()
    }

    pub(super) fn client(&self) -> &DirectoryClient {
        &self.client
    }

    /// Re-resolve the service and replace the cached list.
    ///
    /// Returns [`UpdateOutcome::Skipped`] without touching the network when
    /// another refresh is running. On any error the previous list stays in
    /// place.
    pub async fn update(&self) -> Result<UpdateOutcome, DiscoveryError> {
        let Some(_permit) = self.refresh_guard.try_acquire() else {
            debug!(service = self.query.service(), "Refresh already in progress, skipping");
            return Ok(UpdateOutcome::Skipped);
        };

        let srv_records = self
            .client
            .query(&self.question, RecordType::SRV)
            .await?
            .into_srv()?;

        let endpoints = match self.config.address_mode {
            AddressMode::Embedded => Self::endpoints_from_targets(&srv_records)?,
            AddressMode::Lookup => self.endpoints_from_lookups(&srv_records).await?,
        };

        let count = endpoints.len();
        self.cache.replace(endpoints);

        debug!(
            service = self.query.service(),
            endpoints = count,
            "Endpoints refreshed"
        );
        Ok(UpdateOutcome::Refreshed { endpoints: count })
    }

    pub fn all(&self) -> Arc<[Endpoint]> {
        self.cache.all()
    }

    pub fn random(&self) -> Option<Endpoint> {
        self.cache.random()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Option<Endpoint> {
        self.cache.next()
    }

    /// Drain the pool, shutting down each idle connection. Shutdown failures
    /// go to the diagnostic sink. The resolver stays usable; the next
    /// refresh dials again.
    pub async fn close(&self) {
        let closed = self.client.close().await;
        info!(service = self.query.service(), connections = closed, "Directory connections closed");
    }

    fn endpoints_from_targets(srv_records: &[SrvAnswer]) -> Result<Vec<Endpoint>, DiscoveryError> {
        srv_records
            .iter()
            .map(|srv| {
                decode_embedded_address(&srv.target.to_utf8())
                    .map(|ip| Endpoint::new(ip, srv.port))
            })
            .collect()
    }

    /// One A query per distinct target, then pair every SRV answer (in
    /// order) with its target's address. A target without an address fails
    /// the whole refresh.
    async fn endpoints_from_lookups(
        &self,
        srv_records: &[SrvAnswer],
    ) -> Result<Vec<Endpoint>, DiscoveryError> {
        let mut seen = HashSet::new();
        let targets: Vec<&Name> = srv_records
            .iter()
            .map(|srv| &srv.target)
            .filter(|target| seen.insert(*target))
            .collect();

        let mut addresses: HashMap<&Name, Ipv4Addr> = HashMap::with_capacity(targets.len());
        for target in targets {
            let answers = self.client.query(target, RecordType::A).await?.into_a()?;
            if let Some(last) = answers.last() {
                addresses.insert(target, last.address);
            }
        }

        srv_records
            .iter()
            .map(|srv| {
                addresses
                    .get(&srv.target)
                    .map(|ip| Endpoint::new(*ip, srv.port))
                    .ok_or_else(|| DiscoveryError::MissingAddress {
                        host: srv.target.to_utf8(),
                    })
            })
            .collect()
    }
}

#[async_trait]
impl EndpointResolver for ConsulResolver {
    async fn update(&self) -> Result<UpdateOutcome, DiscoveryError> {
        ConsulResolver::update(self).await
    }

    fn all(&self) -> Arc<[Endpoint]> {
        ConsulResolver::all(self)
    }

    fn random(&self) -> Option<Endpoint> {
        ConsulResolver::random(self)
    }

    fn next(&self) -> Option<Endpoint> {
        ConsulResolver::next(self)
    }

    async fn close(&self) {
        ConsulResolver::close(self).await
    }
}
