pub mod pool;
pub mod tcp;

pub use pool::{ConnectionPool, PoolStats, PooledConnection};
pub use tcp::{read_with_length_prefix, write_framed};
