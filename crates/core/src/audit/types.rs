//! Audit event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use talio_shared::types::{AuditEventId, EmployeeId, HoldId, LeaveRequestId};

use crate::ledger::types::{BalanceKey, BalanceSnapshot, LedgerOperation};
use crate::workflow::router::ActorRole;
use crate::workflow::types::{RequestStatus, WorkflowEvent};

/// An immutable audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique identifier.
    pub id: AuditEventId,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
    /// What happened.
    pub kind: AuditEventKind,
    /// Free-form metadata for the surrounding application.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// The payload of an audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventKind {
    /// A leave request changed state.
    StateChanged {
        /// The request that transitioned.
        request_id: LeaveRequestId,
        /// The state before the transition.
        from: RequestStatus,
        /// The state after the transition.
        to: RequestStatus,
        /// The event that drove the transition.
        event: WorkflowEvent,
        /// Who acted.
        actor_id: EmployeeId,
        /// The role the actor acted under.
        actor_role: ActorRole,
        /// Optional comment from the actor.
        comment: Option<String>,
    },
    /// A ledger row was mutated.
    LedgerMutated {
        /// The mutated row.
        key: BalanceKey,
        /// The operation applied.
        operation: LedgerOperation,
        /// The hold involved, if any.
        hold_id: Option<HoldId>,
        /// Counters before the mutation (absent for row creation).
        before: Option<BalanceSnapshot>,
        /// Counters after the mutation.
        after: BalanceSnapshot,
    },
}

impl AuditEvent {
    /// Creates a new event with a fresh id and timestamp.
    #[must_use]
    pub fn new(kind: AuditEventKind) -> Self {
        Self {
            id: AuditEventId::new(),
            recorded_at: Utc::now(),
            kind,
            metadata: serde_json::Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_event_serializes_with_counters() {
        let key = BalanceKey::new(EmployeeId::new(), "VL", 2026);
        let event = AuditEvent::new(AuditEventKind::LedgerMutated {
            key,
            operation: LedgerOperation::Hold,
            hold_id: Some(HoldId::new()),
            before: Some(BalanceSnapshot {
                earned_days: dec!(15.0),
                carried_forward_days: dec!(0.0),
                used_days: dec!(0.0),
                held_days: dec!(0.0),
                available_days: dec!(15.0),
            }),
            after: BalanceSnapshot {
                earned_days: dec!(15.0),
                carried_forward_days: dec!(0.0),
                used_days: dec!(0.0),
                held_days: dec!(5.0),
                available_days: dec!(10.0),
            },
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["type"], "ledger_mutated");
        assert_eq!(json["kind"]["operation"], "hold");
    }

    #[test]
    fn test_events_get_unique_ids() {
        let key = BalanceKey::new(EmployeeId::new(), "VL", 2026);
        let kind = AuditEventKind::LedgerMutated {
            key,
            operation: LedgerOperation::Provision,
            hold_id: None,
            before: None,
            after: BalanceSnapshot::default(),
        };
        let a = AuditEvent::new(kind.clone());
        let b = AuditEvent::new(kind);
        assert_ne!(a.id, b.id);
    }
}
