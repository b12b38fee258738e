//! Error reporting port.

use tracing::error;

/// Sink for diagnostics the end user never sees.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, context: &str, error: &(dyn std::error::Error + 'static));
}

/// Reporter that logs through `tracing`.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, error: &(dyn std::error::Error + 'static)) {
        error!(error = %error, "{context}");
    }
}

/// Reporter that discards everything.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, _context: &str, _error: &(dyn std::error::Error + 'static)) {}
}
