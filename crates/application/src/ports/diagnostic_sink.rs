use std::fmt;

/// Receives diagnostics about failed connections, deadlines and teardown.
///
/// Used only for reporting; nothing the resolver does depends on it.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, args: fmt::Arguments<'_>);
}

/// Discards every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn log(&self, _args: fmt::Arguments<'_>) {}
}
