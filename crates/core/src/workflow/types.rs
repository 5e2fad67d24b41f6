//! Workflow domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use talio_shared::types::EmployeeId;

use super::router::ActorRole;

/// Status of a leave request in the approval workflow.
///
/// Requests progress `Draft -> PendingSupervisor -> PendingManager ->
/// Approved -> Processed`. `Rejected` and `Cancelled` are terminal
/// absorbing states reachable from any pending state; `Processed` is also
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Request is being assembled and has no ledger hold yet.
    Draft,
    /// Awaiting the supervisor's decision.
    PendingSupervisor,
    /// Awaiting the HR manager's decision.
    PendingManager,
    /// Fully approved, awaiting HR processing.
    Approved,
    /// Processed by HR; the held days are committed (immutable).
    Processed,
    /// Rejected by an approver (immutable).
    Rejected,
    /// Cancelled by the employee or HR proxy (immutable).
    Cancelled,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingSupervisor => "pending_supervisor",
            Self::PendingManager => "pending_manager",
            Self::Approved => "approved",
            Self::Processed => "processed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "pending_supervisor" => Some(Self::PendingSupervisor),
            "pending_manager" => Some(Self::PendingManager),
            "approved" => Some(Self::Approved),
            "processed" => Some(Self::Processed),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no further transitions are permitted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Processed | Self::Rejected | Self::Cancelled)
    }

    /// Returns true if the request still reserves days on the ledger.
    #[must_use]
    pub fn holds_balance(&self) -> bool {
        matches!(
            self,
            Self::PendingSupervisor | Self::PendingManager | Self::Approved
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Commands accepted by the workflow engine.
///
/// `Submit` creates a request; all other events act on an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEvent {
    /// Create and submit a new request.
    Submit,
    /// First-level approval by the supervisor.
    SupervisorApprove,
    /// First-level rejection by the supervisor.
    SupervisorReject,
    /// Second-level approval by the HR manager.
    ManagerApprove,
    /// Second-level rejection by the HR manager.
    ManagerReject,
    /// HR processing: convert the hold into a deduction.
    Process,
    /// Withdraw the request before processing.
    Cancel,
}

impl WorkflowEvent {
    /// Returns the string representation of the event.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submit => "submit",
            Self::SupervisorApprove => "supervisor_approve",
            Self::SupervisorReject => "supervisor_reject",
            Self::ManagerApprove => "manager_approve",
            Self::ManagerReject => "manager_reject",
            Self::Process => "process",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a request's append-only transition log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state before the transition.
    pub from: RequestStatus,
    /// The state after the transition.
    pub to: RequestStatus,
    /// Who acted.
    pub actor_id: EmployeeId,
    /// The role the actor acted under.
    pub actor_role: ActorRole,
    /// When the transition happened.
    pub at: DateTime<Utc>,
    /// Optional comment from the actor.
    pub comment: Option<String>,
}

/// Filter for the request list read model.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    /// Only requests in this status.
    pub status: Option<RequestStatus>,
    /// Only requests from this employee.
    pub employee_id: Option<EmployeeId>,
    /// Only requests whose date range intersects this inclusive range.
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    /// Only requests from employees in this department.
    pub department: Option<String>,
}
