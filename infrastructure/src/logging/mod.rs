//! Logging infrastructure: the vote audit trail.
//!
//! Provides [`JsonlAuditLogger`], an append-only JSONL writer that implements
//! the [`AuditLogger`](combis_application::AuditLogger) port.

mod audit_log;

pub use audit_log::JsonlAuditLogger;
