//! Workflow error types.

use chrono::NaiveDate;
use talio_shared::error::AppError;
use talio_shared::types::{EmployeeId, LeaveRequestId};
use thiserror::Error;

use super::types::{RequestStatus, WorkflowEvent};
use crate::ledger::LedgerError;
use crate::policy::PolicyError;

/// Errors that can occur during workflow operations.
///
/// Every variant is a recoverable, caller-facing rejection: the operation
/// is refused and no state changes.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Start date is after the end date.
    #[error("Invalid dates: start {start} is after end {end}")]
    StartAfterEnd {
        /// The requested start date.
        start: NaiveDate,
        /// The requested end date.
        end: NaiveDate,
    },

    /// Start date is in the past and the actor may not backdate.
    #[error("Invalid dates: start {start} is in the past")]
    BackdatedStart {
        /// The requested start date.
        start: NaiveDate,
    },

    /// Another open request of the same employee covers part of the range.
    #[error("Date range overlaps open request {conflicting_request}")]
    DateConflict {
        /// The open request that overlaps.
        conflicting_request: LeaveRequestId,
    },

    /// The event is not valid for the request's current status.
    #[error("Event {event} is not valid in status {from}")]
    InvalidTransition {
        /// The current status.
        from: RequestStatus,
        /// The attempted event.
        event: WorkflowEvent,
    },

    /// The actor lacks the authority for the attempted event.
    #[error("Actor {actor_id} may not {event}; requires {required}")]
    Forbidden {
        /// The actor who attempted the event.
        actor_id: EmployeeId,
        /// The attempted event.
        event: WorkflowEvent,
        /// What would have been required.
        required: String,
    },

    /// Leave request not found.
    #[error("Leave request {0} not found")]
    RequestNotFound(LeaveRequestId),

    /// Employee not found in the directory.
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// Employee is terminated/inactive.
    #[error("Employee {0} is inactive")]
    EmployeeInactive(EmployeeId),

    /// A ledger operation was refused.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A policy catalog lookup failed.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl WorkflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::StartAfterEnd { .. } | Self::BackdatedStart { .. } => "INVALID_DATES",
            Self::DateConflict { .. } => "DATE_CONFLICT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::EmployeeInactive(_) => "EMPLOYEE_INACTIVE",
            Self::Ledger(inner) => inner.error_code(),
            Self::Policy(inner) => inner.error_code(),
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::StartAfterEnd { .. } | WorkflowError::BackdatedStart { .. } => {
                Self::Validation(message)
            }
            WorkflowError::DateConflict { .. } => Self::Conflict(message),
            WorkflowError::InvalidTransition { .. } => Self::BusinessRule(message),
            WorkflowError::Forbidden { .. } => Self::Forbidden(message),
            WorkflowError::RequestNotFound(_) | WorkflowError::EmployeeNotFound(_) => {
                Self::NotFound(message)
            }
            WorkflowError::EmployeeInactive(_) => Self::BusinessRule(message),
            WorkflowError::Ledger(inner) => match inner {
                LedgerError::InsufficientBalance { .. }
                | LedgerError::NonPositiveDays(_)
                | LedgerError::InvalidHoldState { .. }
                | LedgerError::DuplicateBalance { .. } => Self::BusinessRule(message),
                LedgerError::BalanceNotFound { .. } | LedgerError::HoldNotFound(_) => {
                    Self::NotFound(message)
                }
                LedgerError::InvariantViolation(_) => Self::Internal(message),
            },
            WorkflowError::Policy(_) => Self::Validation(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        let err = WorkflowError::StartAfterEnd {
            start: NaiveDate::from_ymd_opt(2026, 12, 5).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
        };
        assert_eq!(err.error_code(), "INVALID_DATES");

        assert_eq!(
            WorkflowError::DateConflict {
                conflicting_request: LeaveRequestId::new(),
            }
            .error_code(),
            "DATE_CONFLICT"
        );
        assert_eq!(
            WorkflowError::InvalidTransition {
                from: RequestStatus::Processed,
                event: WorkflowEvent::Cancel,
            }
            .error_code(),
            "INVALID_TRANSITION"
        );
        assert_eq!(
            WorkflowError::RequestNotFound(LeaveRequestId::new()).error_code(),
            "REQUEST_NOT_FOUND"
        );
    }

    #[test]
    fn test_ledger_errors_keep_their_code() {
        let err = WorkflowError::from(LedgerError::InsufficientBalance {
            available: dec!(3.5),
            requested: dec!(5),
        });
        assert_eq!(err.error_code(), "INSUFFICIENT_BALANCE");
        assert_eq!(
            err.to_string(),
            "Insufficient balance: 3.5 days available, 5 requested"
        );
    }

    #[test]
    fn test_policy_errors_keep_their_code() {
        let err = WorkflowError::from(PolicyError::UnknownLeaveType("XX".to_string()));
        assert_eq!(err.error_code(), "UNKNOWN_LEAVE_TYPE");
    }

    #[test]
    fn test_app_error_mapping() {
        let forbidden = AppError::from(WorkflowError::Forbidden {
            actor_id: EmployeeId::new(),
            event: WorkflowEvent::Process,
            required: "hr_admin".to_string(),
        });
        assert_eq!(forbidden.status_code(), 403);

        let conflict = AppError::from(WorkflowError::DateConflict {
            conflicting_request: LeaveRequestId::new(),
        });
        assert_eq!(conflict.status_code(), 409);

        let insufficient = AppError::from(WorkflowError::from(
            LedgerError::InsufficientBalance {
                available: dec!(0),
                requested: dec!(1),
            },
        ));
        assert_eq!(insufficient.status_code(), 422);

        let invariant = AppError::from(WorkflowError::from(LedgerError::InvariantViolation(
            "counters disagree".to_string(),
        )));
        assert_eq!(invariant.status_code(), 500);
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = WorkflowError::InvalidTransition {
            from: RequestStatus::Rejected,
            event: WorkflowEvent::Process,
        };
        assert_eq!(err.to_string(), "Event process is not valid in status rejected");
    }
}
