use ferrous_discovery_application::ports::DiagnosticSink;
use std::fmt;
use tracing::warn;

/// Forwards resolver diagnostics to `tracing` at WARN level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, args: fmt::Arguments<'_>) {
        warn!(target: "ferrous_discovery::diagnostics", "{}", args);
    }
}
