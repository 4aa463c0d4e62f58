pub mod codec;
pub mod resolver;
pub mod sink;
pub mod transport;

pub use codec::{
    decode_embedded_address, AAnswer, Answer, DirectoryResponse, FramedQuery, MessageBuilder,
    ResponseParser, SrvAnswer,
};
pub use resolver::{ConsulResolver, ConsulResolverBuilder, DirectoryClient};
pub use sink::TracingSink;
pub use transport::{ConnectionPool, PoolStats, PooledConnection};
