//! The leave workflow engine.
//!
//! Orchestrates the request lifecycle: submission preconditions, the
//! transition table, approval authorization, and the matching ledger
//! effects. Each transition is applied as one atomic unit; a refused
//! ledger operation leaves the request untouched and vice versa.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Datelike, Utc};
use talio_shared::types::{HoldId, LeaveRequestId};
use talio_shared::types::pagination::{PageRequest, PageResponse};
use tracing::info;

use super::error::WorkflowError;
use super::request::{LeaveRequest, SubmitLeave};
use super::router::{Actor, ApprovalRouter, RequiredApprover};
use super::types::{RequestFilter, RequestStatus, WorkflowEvent};
use crate::audit::{AuditEvent, AuditEventKind, AuditRecorder};
use crate::directory::EmployeeDirectory;
use crate::ledger::{BalanceKey, BalanceLedger, BalanceSnapshot, LedgerError};
use crate::policy::PolicyCatalog;

/// The transition table.
///
/// Derives the status an event leads to, or refuses the event for the
/// current status. Terminal statuses accept nothing.
///
/// # Errors
///
/// Returns `WorkflowError::InvalidTransition` for any pair not in the table.
pub fn next_status(
    from: RequestStatus,
    event: WorkflowEvent,
) -> Result<RequestStatus, WorkflowError> {
    use RequestStatus as S;
    use WorkflowEvent as E;

    match (from, event) {
        (S::PendingSupervisor, E::SupervisorApprove) => Ok(S::PendingManager),
        (S::PendingSupervisor, E::SupervisorReject) => Ok(S::Rejected),
        (S::PendingManager, E::ManagerApprove) => Ok(S::Approved),
        (S::PendingManager, E::ManagerReject) => Ok(S::Rejected),
        (S::Approved, E::Process) => Ok(S::Processed),
        (S::PendingSupervisor | S::PendingManager | S::Approved, E::Cancel) => Ok(S::Cancelled),
        _ => Err(WorkflowError::InvalidTransition { from, event }),
    }
}

/// The workflow engine: owns the request store and drives the ledger.
pub struct LeaveWorkflowEngine {
    requests: RwLock<HashMap<LeaveRequestId, LeaveRequest>>,
    ledger: Arc<BalanceLedger>,
    catalog: Arc<PolicyCatalog>,
    directory: Arc<dyn EmployeeDirectory>,
    recorder: Arc<dyn AuditRecorder>,
}

impl LeaveWorkflowEngine {
    /// Creates an engine over the given collaborators.
    #[must_use]
    pub fn new(
        ledger: Arc<BalanceLedger>,
        catalog: Arc<PolicyCatalog>,
        directory: Arc<dyn EmployeeDirectory>,
        recorder: Arc<dyn AuditRecorder>,
    ) -> Self {
        Self {
            requests: RwLock::new(HashMap::new()),
            ledger,
            catalog,
            directory,
            recorder,
        }
    }

    /// Submits a new leave request.
    ///
    /// Validates the dates, the employee (active, supervisor frozen from
    /// the directory), the leave type, and the absence of overlapping open
    /// requests, then places the ledger hold and stores the request in
    /// `PendingSupervisor`. The request-store lock is held for the whole
    /// sequence, so two overlapping submissions cannot both pass the
    /// conflict check.
    ///
    /// # Errors
    ///
    /// `StartAfterEnd`/`BackdatedStart`, `EmployeeNotFound`/
    /// `EmployeeInactive`, `UnknownLeaveType`, `DateConflict`, or the
    /// ledger's `InsufficientBalance`/`BalanceNotFound`. On every error no
    /// request is created and the ledger is unchanged.
    pub fn submit(&self, input: SubmitLeave, actor: &Actor) -> Result<LeaveRequest, WorkflowError> {
        let employee = self
            .directory
            .find(input.employee_id)
            .ok_or(WorkflowError::EmployeeNotFound(input.employee_id))?;
        if !employee.active {
            return Err(WorkflowError::EmployeeInactive(input.employee_id));
        }
        self.catalog.get(&input.leave_type_code)?;

        let mut request = LeaveRequest::new(input, employee.supervisor_id)?;
        ApprovalRouter::authorize(&request, actor, WorkflowEvent::Submit)?;
        if request.start_date < Utc::now().date_naive() && !ApprovalRouter::can_backdate(actor) {
            return Err(WorkflowError::BackdatedStart {
                start: request.start_date,
            });
        }

        let mut requests = self
            .requests
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        for existing in requests.values() {
            if existing.employee_id == request.employee_id
                && !existing.status.is_terminal()
                && existing.overlaps(request.start_date, request.end_date)
            {
                return Err(WorkflowError::DateConflict {
                    conflicting_request: existing.id,
                });
            }
        }

        let key = BalanceKey::new(
            request.employee_id,
            request.leave_type_code.clone(),
            request.start_date.year(),
        );
        let hold_id = self.ledger.hold(&key, request.days_requested)?;

        request.hold_id = Some(hold_id);
        request.record_transition(RequestStatus::PendingSupervisor, actor, None);
        let stored = request.clone();
        requests.insert(stored.id, request);
        drop(requests);

        info!(
            request_id = %stored.id,
            employee_id = %stored.employee_id,
            days = %stored.days_requested,
            "leave request submitted"
        );
        self.emit_state_change(&stored, RequestStatus::Draft, WorkflowEvent::Submit, actor, None);
        Ok(stored)
    }

    /// Applies an event to an existing request.
    ///
    /// Transition validity is checked before authorization, so terminal
    /// requests always answer `InvalidTransition` regardless of the actor.
    /// The ledger effect runs before the state change; a refused ledger
    /// operation leaves the request untouched.
    ///
    /// # Errors
    ///
    /// `RequestNotFound`, `InvalidTransition`, `Forbidden`, or a ledger
    /// error from the hold settlement.
    pub fn act_on(
        &self,
        request_id: LeaveRequestId,
        event: WorkflowEvent,
        actor: &Actor,
        comment: Option<String>,
    ) -> Result<LeaveRequest, WorkflowError> {
        let mut requests = self
            .requests
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let request = requests
            .get_mut(&request_id)
            .ok_or(WorkflowError::RequestNotFound(request_id))?;

        let to = next_status(request.status, event)?;
        ApprovalRouter::authorize(request, actor, event)?;

        match event {
            WorkflowEvent::SupervisorReject
            | WorkflowEvent::ManagerReject
            | WorkflowEvent::Cancel => {
                self.ledger.release(Self::held(request)?)?;
            }
            WorkflowEvent::Process => {
                self.ledger
                    .commit(Self::held(request)?, request.days_requested)?;
            }
            WorkflowEvent::Submit
            | WorkflowEvent::SupervisorApprove
            | WorkflowEvent::ManagerApprove => {}
        }

        let from = request.status;
        request.record_transition(to, actor, comment.clone());
        let stored = request.clone();
        drop(requests);

        info!(
            request_id = %stored.id,
            %event,
            from = %from,
            to = %stored.status,
            "leave request transitioned"
        );
        self.emit_state_change(&stored, from, event, actor, comment);
        Ok(stored)
    }

    /// Fetches a request by id.
    ///
    /// # Errors
    ///
    /// `RequestNotFound` when no such request exists.
    pub fn get(&self, request_id: LeaveRequestId) -> Result<LeaveRequest, WorkflowError> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&request_id)
            .cloned()
            .ok_or(WorkflowError::RequestNotFound(request_id))
    }

    /// Who must act next on a request, if anyone.
    ///
    /// # Errors
    ///
    /// `RequestNotFound` when no such request exists.
    pub fn next_approver(
        &self,
        request_id: LeaveRequestId,
    ) -> Result<Option<RequiredApprover>, WorkflowError> {
        Ok(ApprovalRouter::next_approver(&self.get(request_id)?))
    }

    /// Balance snapshot passthrough for the read model.
    ///
    /// # Errors
    ///
    /// The ledger's `BalanceNotFound`.
    pub fn balance(&self, key: &BalanceKey) -> Result<BalanceSnapshot, WorkflowError> {
        Ok(self.ledger.snapshot(key)?)
    }

    /// Filtered, paginated request listing for the report layer.
    ///
    /// Results are ordered by creation time. The department filter resolves
    /// each request's employee through the directory.
    #[must_use]
    pub fn list(&self, filter: &RequestFilter, page: &PageRequest) -> PageResponse<LeaveRequest> {
        let requests = self.requests.read().unwrap_or_else(PoisonError::into_inner);

        let mut matched: Vec<LeaveRequest> = requests
            .values()
            .filter(|r| filter.status.is_none_or(|status| r.status == status))
            .filter(|r| filter.employee_id.is_none_or(|id| r.employee_id == id))
            .filter(|r| {
                filter
                    .date_range
                    .is_none_or(|(start, end)| r.overlaps(start, end))
            })
            .filter(|r| match &filter.department {
                Some(department) => self
                    .directory
                    .find(r.employee_id)
                    .is_some_and(|record| record.department == *department),
                None => true,
            })
            .cloned()
            .collect();
        drop(requests);

        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.0.cmp(&b.id.0)));

        let total = matched.len() as u64;
        let data = matched
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();
        PageResponse::new(data, page.page, page.per_page, total)
    }

    fn held(request: &LeaveRequest) -> Result<HoldId, WorkflowError> {
        request.hold_id.ok_or_else(|| {
            WorkflowError::Ledger(LedgerError::InvariantViolation(format!(
                "request {} has no ledger hold",
                request.id
            )))
        })
    }

    fn emit_state_change(
        &self,
        request: &LeaveRequest,
        from: RequestStatus,
        event: WorkflowEvent,
        actor: &Actor,
        comment: Option<String>,
    ) {
        let audit = AuditEvent::new(AuditEventKind::StateChanged {
            request_id: request.id,
            from,
            to: request.status,
            event,
            actor_id: actor.id,
            actor_role: actor.role,
            comment,
        });
        if let Err(err) = self.recorder.record(audit) {
            tracing::warn!(error = %err, "audit recorder failed, continuing without audit trail");
        }
    }
}
