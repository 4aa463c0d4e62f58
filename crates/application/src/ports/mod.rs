mod diagnostic_sink;
mod endpoint_resolver;

pub use diagnostic_sink::{DiagnosticSink, NoopSink};
pub use endpoint_resolver::{EndpointResolver, UpdateOutcome};
