//! Audit events and the recorder seam.
//!
//! Every state transition and every ledger mutation produces exactly one
//! immutable audit event. Recording is fire-and-append: a failing recorder
//! must never roll back the operation that produced the event, it only
//! degrades the system to warn-level logging.
//!
//! # Modules
//!
//! - `types` - Audit event types
//! - `recorder` - The `AuditRecorder` trait and bundled implementations

pub mod recorder;
pub mod types;

pub use recorder::{AuditError, AuditRecorder, LogRecorder, MemoryRecorder};
pub use types::{AuditEvent, AuditEventKind};
