use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::errors::ConfigError;
use crate::AddressMode;

/// Connection and lookup settings for a directory-backed resolver.
///
/// Every field has a default, so an empty `[resolver]` table (or no table at all)
/// yields a resolver pointed at a local agent on `127.0.0.1:8600`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// `host:port` of the directory's DNS-over-TCP endpoint.
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_datacenter")]
    pub datacenter: String,

    #[serde(default = "default_domain")]
    pub domain: String,

    /// Bound applied to dialing and to every individual write and read.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub address_mode: AddressMode,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            datacenter: default_datacenter(),
            domain: default_domain(),
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            address_mode: AddressMode::default(),
        }
    }
}

impl ResolverConfig {
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_datacenter(mut self, datacenter: impl Into<String>) -> Self {
        self.datacenter = datacenter.into();
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Stored in whole milliseconds, rounded up so a non-zero timeout never
    /// becomes zero.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = timeout.as_millis() + u128::from(timeout.subsec_nanos() % 1_000_000 != 0);
        self.timeout_ms = millis.min(u64::MAX as u128) as u64;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode = mode;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Directory address cannot be empty".to_string(),
            ));
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "At least one request attempt is required".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_address() -> String {
    "127.0.0.1:8600".to_string()
}

fn default_datacenter() -> String {
    "dc1".to_string()
}

fn default_domain() -> String {
    "consul".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_attempts() -> u32 {
    16
}
