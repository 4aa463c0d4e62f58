//! Ferrous Discovery Domain Layer
pub mod address_mode;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod record_type;
pub mod service_query;

pub use address_mode::AddressMode;
pub use config::{CliOverrides, Config, ConfigError, LoggingConfig, ResolverConfig};
pub use endpoint::Endpoint;
pub use errors::DiscoveryError;
pub use record_type::RecordType;
pub use service_query::ServiceQuery;
