mod endpoint_cache;
mod refresh_guard;

pub use endpoint_cache::EndpointCache;
pub use refresh_guard::{RefreshGuard, RefreshPermit};
