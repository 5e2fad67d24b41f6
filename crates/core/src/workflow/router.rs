//! Actor roles and approval authorization.
//!
//! The router owns every actor-authority guard of the transition table:
//! the engine asks it who must act next and whether a given actor may
//! drive a given event. Role checks live here and nowhere else.

use serde::{Deserialize, Serialize};
use talio_shared::types::EmployeeId;

use super::error::WorkflowError;
use super::request::LeaveRequest;
use super::types::{RequestStatus, WorkflowEvent};

/// Actor role in the approval chain.
///
/// Roles are ordered from lowest to highest privilege. Higher roles can
/// perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorRole {
    /// A regular employee; can submit and cancel their own requests.
    Employee = 0,
    /// A reporting-line supervisor; decides the first approval step.
    Supervisor = 1,
    /// An HR manager; decides the second approval step.
    HrManager = 2,
    /// HR administration; processes approved leave and may act as proxy.
    HrAdmin = 3,
}

impl ActorRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "supervisor" => Some(Self::Supervisor),
            "hr_manager" => Some(Self::HrManager),
            "hr_admin" => Some(Self::HrAdmin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Supervisor => "supervisor",
            Self::HrManager => "hr_manager",
            Self::HrAdmin => "hr_admin",
        }
    }
}

/// An authenticated actor, resolved once at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The actor's employee id.
    pub id: EmployeeId,
    /// The role the actor holds.
    pub role: ActorRole,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(id: EmployeeId, role: ActorRole) -> Self {
        Self { id, role }
    }
}

/// Who must act next on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredApprover {
    /// The role that must act.
    pub role: ActorRole,
    /// The specific actor, when the step is bound to one (the frozen
    /// supervisor); `None` when any holder of the role may act.
    pub actor_id: Option<EmployeeId>,
}

/// Stateless engine for deriving and checking approval authority.
pub struct ApprovalRouter;

impl ApprovalRouter {
    /// Derives who must act next from the current status and the frozen
    /// supervisor. Returns `None` for draft and terminal requests.
    #[must_use]
    pub fn next_approver(request: &LeaveRequest) -> Option<RequiredApprover> {
        match request.status {
            RequestStatus::PendingSupervisor => Some(RequiredApprover {
                role: ActorRole::Supervisor,
                actor_id: request.supervisor_id,
            }),
            RequestStatus::PendingManager => Some(RequiredApprover {
                role: ActorRole::HrManager,
                actor_id: None,
            }),
            RequestStatus::Approved => Some(RequiredApprover {
                role: ActorRole::HrAdmin,
                actor_id: None,
            }),
            _ => None,
        }
    }

    /// Verifies that the actor may drive the attempted event.
    ///
    /// Only actor authority is checked here; whether the event is valid for
    /// the request's current status is the transition table's concern.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::Forbidden` on a role/identity mismatch; the
    /// caller must not apply the transition.
    pub fn authorize(
        request: &LeaveRequest,
        actor: &Actor,
        event: WorkflowEvent,
    ) -> Result<(), WorkflowError> {
        let allowed = match event {
            // Submission is open to the employee themself and to HR staff
            // entering leave on an employee's behalf.
            WorkflowEvent::Submit => {
                actor.id == request.employee_id || actor.role >= ActorRole::HrAdmin
            }
            // The frozen supervisor, or an HR manager standing in.
            WorkflowEvent::SupervisorApprove | WorkflowEvent::SupervisorReject => {
                request.supervisor_id == Some(actor.id) || actor.role >= ActorRole::HrManager
            }
            WorkflowEvent::ManagerApprove | WorkflowEvent::ManagerReject => {
                actor.role >= ActorRole::HrManager
            }
            WorkflowEvent::Process => actor.role >= ActorRole::HrAdmin,
            // The requesting employee, or an HR proxy.
            WorkflowEvent::Cancel => {
                actor.id == request.employee_id || actor.role >= ActorRole::HrAdmin
            }
        };

        if allowed {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden {
                actor_id: actor.id,
                event,
                required: Self::requirement(request, event),
            })
        }
    }

    /// Returns true if the actor may submit with a start date in the past.
    #[must_use]
    pub fn can_backdate(actor: &Actor) -> bool {
        actor.role >= ActorRole::HrAdmin
    }

    fn requirement(request: &LeaveRequest, event: WorkflowEvent) -> String {
        match event {
            WorkflowEvent::Submit | WorkflowEvent::Cancel => {
                "the requesting employee or an HR proxy".to_string()
            }
            WorkflowEvent::SupervisorApprove | WorkflowEvent::SupervisorReject => {
                match request.supervisor_id {
                    Some(id) => format!("supervisor {id} or an HR manager"),
                    None => "an HR manager".to_string(),
                }
            }
            WorkflowEvent::ManagerApprove | WorkflowEvent::ManagerReject => {
                ActorRole::HrManager.as_str().to_string()
            }
            WorkflowEvent::Process => ActorRole::HrAdmin.as_str().to_string(),
        }
    }
}
