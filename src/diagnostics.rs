//! Sink for recoverable problems found while decoding.
//!
//! The decoder reports faces it skips and formats it refuses through a
//! [`Diagnostics`] implementation. Reporting never changes the decode outcome.

use std::sync::Mutex;

/// Receives human-readable messages about recoverable decode events.
pub trait Diagnostics {
    /// Called once per event.
    fn warn(&self, message: &str);
}

/// Forwards every message to `tracing` at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "ply_mesh", "{}", message);
    }
}

impl<F: Fn(&str)> Diagnostics for F {
    fn warn(&self, message: &str) {
        self(message)
    }
}

/// Records messages so they can be inspected after decoding.
#[derive(Debug, Default)]
pub struct CollectDiagnostics {
    messages: Mutex<Vec<String>>,
}

impl CollectDiagnostics {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded messages, leaving the recorder empty.
    pub fn take(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(mut m) => std::mem::take(&mut *m),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Diagnostics for CollectDiagnostics {
    fn warn(&self, message: &str) {
        match self.messages.lock() {
            Ok(mut m) => m.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
