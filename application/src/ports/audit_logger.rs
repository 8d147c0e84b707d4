//! Port for the structured audit trail.
//!
//! Vote lifecycle events (creation, responses, closing, result application)
//! are recorded as JSON payloads, separate from `tracing` diagnostics:
//! tracing is for operators, the audit trail is the association's record
//! of what happened to each vote.

use serde_json::Value;

/// A structured audit event.
pub struct AuditEvent {
    /// Event type identifier (e.g., "vote_created", "vote_closed").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl AuditEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for recording audit events.
///
/// `log` is synchronous and non-fallible: a failing audit sink must never
/// disturb the vote it describes.
pub trait AuditLogger: Send + Sync {
    fn log(&self, event: AuditEvent);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLogger;

impl AuditLogger for NoAuditLogger {
    fn log(&self, _event: AuditEvent) {}
}
