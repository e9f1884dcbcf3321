//! Sinks that receive payloads rejected during decoding.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use tacora_types::TacoraError;
use tracing::warn;

/// Receives the textual form of every payload that fails to decode.
///
/// The sink only observes; the error is still returned to the caller.
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    /// Called once per rejected payload, before the error is returned.
    fn report(&self, family: &str, raw: &str, error: &TacoraError);
}

/// Logs rejected payloads through `tracing` at WARN level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, family: &str, raw: &str, error: &TacoraError) {
        warn!(family, %error, raw, "rejected payload");
    }
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _family: &str, _raw: &str, _error: &TacoraError) {}
}

/// One report captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Family of the rejected payload.
    pub family: String,
    /// Textual form of the payload.
    pub raw: String,
    /// Rendered error message.
    pub message: String,
}

/// Keeps every report in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every report received so far.
    #[must_use]
    pub fn reports(&self) -> Vec<Diagnostic> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, family: &str, raw: &str, error: &TacoraError) {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Diagnostic {
                family: family.to_string(),
                raw: raw.to_string(),
                message: error.to_string(),
            });
    }
}
