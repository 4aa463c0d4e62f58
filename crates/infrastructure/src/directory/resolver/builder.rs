use super::client::DirectoryClient;
use super::consul::ConsulResolver;
use ferrous_discovery_application::ports::{DiagnosticSink, NoopSink};
use ferrous_discovery_domain::{AddressMode, DiscoveryError, ResolverConfig, ServiceQuery};
use hickory_proto::rr::Name;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

pub struct ConsulResolverBuilder {
    service: String,
    config: ResolverConfig,
    sink: Arc<dyn DiagnosticSink>,
}

impl ConsulResolverBuilder {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            config: ResolverConfig::default(),
            sink: Arc::new(NoopSink),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.config.datacenter = datacenter.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.config.domain = domain.into();
        self
    }

    /// Bound for dialing and for each individual write and read.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.config.max_attempts = attempts;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Read addresses out of SRV targets instead of issuing A queries.
    pub fn with_embedded_addresses(mut self) -> Self {
        self.config.address_mode = AddressMode::Embedded;
        self
    }

    /// Validate the configuration and compose the query name. No network I/O.
    pub fn build(self) -> Result<ConsulResolver, DiscoveryError> {
        self.config
            .validate()
            .map_err(|e| DiscoveryError::InvalidConfig(e.to_string()))?;

        let query = ServiceQuery::new(&self.service, &self.config.datacenter, &self.config.domain)?;
        let question = Name::from_str(query.name()).map_err(|e| {
            DiscoveryError::InvalidServiceName(format!("'{}': {}", query.name(), e))
        })?;

        let client = DirectoryClient::new(
            self.config.address.as_str(),
            self.config.timeout(),
            self.config.max_attempts,
            self.sink,
        );

        Ok(ConsulResolver::from_parts(query, question, self.config, client))
    }

    /// Like [`build`](Self::build), then dial the directory once and keep the
    /// connection pooled. Fails with a connectivity error if it is unreachable.
    pub async fn build_connected(self) -> Result<ConsulResolver, DiscoveryError> {
        let resolver = self.build()?;
        resolver.client().warm_up().await?;
        Ok(resolver)
    }
}
