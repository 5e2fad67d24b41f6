//! The leave request entity.
//!
//! Pure data plus shape validation. Balance checks, overlap detection, and
//! authorization all live in the engine, ledger, and router.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use talio_shared::types::{EmployeeId, HoldId, LeaveRequestId};

use super::error::WorkflowError;
use super::router::Actor;
use super::types::{RequestStatus, StateTransition};

/// Input for submitting a new leave request.
#[derive(Debug, Clone)]
pub struct SubmitLeave {
    /// The employee taking leave.
    pub employee_id: EmployeeId,
    /// The leave type code (e.g. "VL").
    pub leave_type_code: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Optional free-text reason.
    pub reason: Option<String>,
}

/// A leave request and its full transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier.
    pub id: LeaveRequestId,
    /// The employee taking leave.
    pub employee_id: EmployeeId,
    /// The leave type code.
    pub leave_type_code: String,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Calendar days requested, both endpoints inclusive.
    pub days_requested: Decimal,
    /// Optional free-text reason.
    pub reason: Option<String>,
    /// Current workflow status.
    pub status: RequestStatus,
    /// The supervisor resolved at submission time and frozen; later
    /// organizational changes never alter an in-flight request's approver.
    pub supervisor_id: Option<EmployeeId>,
    /// The ledger hold reserving the requested days.
    pub hold_id: Option<HoldId>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// Append-only transition log; the request's full audit trail.
    pub transitions: Vec<StateTransition>,
}

impl LeaveRequest {
    /// Creates a new request in `Draft`.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::StartAfterEnd` when the dates are inverted.
    pub fn new(
        input: SubmitLeave,
        supervisor_id: Option<EmployeeId>,
    ) -> Result<Self, WorkflowError> {
        if input.start_date > input.end_date {
            return Err(WorkflowError::StartAfterEnd {
                start: input.start_date,
                end: input.end_date,
            });
        }

        Ok(Self {
            id: LeaveRequestId::new(),
            employee_id: input.employee_id,
            leave_type_code: input.leave_type_code,
            days_requested: inclusive_days(input.start_date, input.end_date),
            start_date: input.start_date,
            end_date: input.end_date,
            reason: input.reason,
            status: RequestStatus::Draft,
            supervisor_id,
            hold_id: None,
            created_at: Utc::now(),
            transitions: Vec::new(),
        })
    }

    /// Returns true if this request's date range intersects the given
    /// inclusive range.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    /// Appends a transition to the log and advances the status.
    ///
    /// The log is append-only; entries are never edited or removed.
    pub fn record_transition(
        &mut self,
        to: RequestStatus,
        actor: &Actor,
        comment: Option<String>,
    ) {
        self.transitions.push(StateTransition {
            from: self.status,
            to,
            actor_id: actor.id,
            actor_role: actor.role,
            at: Utc::now(),
            comment,
        });
        self.status = to;
    }
}

/// Calendar day count with both endpoints inclusive.
///
/// No weekend or holiday exclusion; a working-day rule would be a policy
/// catalog concern.
fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from((end - start).num_days() + 1)
}
