pub mod builder;
pub mod client;
pub mod consul;

pub use builder::ConsulResolverBuilder;
pub use client::DirectoryClient;
pub use consul::ConsulResolver;
