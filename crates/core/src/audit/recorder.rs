//! The audit recorder seam.

use std::sync::Mutex;

use thiserror::Error;
use tracing::info;

use super::types::AuditEvent;

/// Errors that can occur while recording an audit event.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The underlying sink rejected the event.
    #[error("Audit sink error: {0}")]
    Sink(String),
}

/// Receives one immutable event per state transition and ledger mutation.
///
/// Implementations must be cheap enough to call inside a transition; slow
/// sinks should buffer internally. A returned error is surfaced by the
/// caller as a degraded-mode warning and never rolls back the operation.
pub trait AuditRecorder: Send + Sync {
    /// Appends an event to the audit trail.
    fn record(&self, event: AuditEvent) -> Result<(), AuditError>;
}

/// In-memory recorder for tests and introspection.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditRecorder for MemoryRecorder {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .map_err(|_| AuditError::Sink("audit buffer poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}

/// Recorder that forwards events to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct LogRecorder;

impl AuditRecorder for LogRecorder {
    fn record(&self, event: AuditEvent) -> Result<(), AuditError> {
        let payload = serde_json::to_string(&event)
            .map_err(|err| AuditError::Sink(err.to_string()))?;
        info!(target: "talio::audit", %payload, "audit event");
        Ok(())
    }
}
