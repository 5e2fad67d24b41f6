//! Property-based tests for the workflow state machine and router.

use chrono::NaiveDate;
use proptest::prelude::*;
use talio_shared::types::EmployeeId;

use crate::workflow::error::WorkflowError;
use crate::workflow::request::{LeaveRequest, SubmitLeave};
use crate::workflow::router::{Actor, ActorRole, ApprovalRouter};
use crate::workflow::service::next_status;
use crate::workflow::types::{RequestStatus, WorkflowEvent};

fn arb_status() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Draft),
        Just(RequestStatus::PendingSupervisor),
        Just(RequestStatus::PendingManager),
        Just(RequestStatus::Approved),
        Just(RequestStatus::Processed),
        Just(RequestStatus::Rejected),
        Just(RequestStatus::Cancelled),
    ]
}

fn arb_event() -> impl Strategy<Value = WorkflowEvent> {
    prop_oneof![
        Just(WorkflowEvent::Submit),
        Just(WorkflowEvent::SupervisorApprove),
        Just(WorkflowEvent::SupervisorReject),
        Just(WorkflowEvent::ManagerApprove),
        Just(WorkflowEvent::ManagerReject),
        Just(WorkflowEvent::Process),
        Just(WorkflowEvent::Cancel),
    ]
}

fn arb_role() -> impl Strategy<Value = ActorRole> {
    prop_oneof![
        Just(ActorRole::Employee),
        Just(ActorRole::Supervisor),
        Just(ActorRole::HrManager),
        Just(ActorRole::HrAdmin),
    ]
}

fn request_in(status: RequestStatus) -> LeaveRequest {
    let mut request = LeaveRequest::new(
        SubmitLeave {
            employee_id: EmployeeId::new(),
            leave_type_code: "VL".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 12, 5).unwrap(),
            reason: None,
        },
        Some(EmployeeId::new()),
    )
    .unwrap();
    request.status = status;
    request
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // ========================================================================
    // Terminal finality: no event leaves a terminal status
    // ========================================================================

    #[test]
    fn prop_terminal_statuses_absorb_everything(
        status in arb_status(),
        event in arb_event(),
    ) {
        prop_assume!(status.is_terminal());

        prop_assert!(
            matches!(
                next_status(status, event),
                Err(WorkflowError::InvalidTransition { .. })
            ),
            "expected InvalidTransition"
        );
    }

    // ========================================================================
    // Every accepted transition moves forward into a different status and
    // never produces Draft
    // ========================================================================

    #[test]
    fn prop_transitions_never_loop_or_revert_to_draft(
        status in arb_status(),
        event in arb_event(),
    ) {
        if let Ok(next) = next_status(status, event) {
            prop_assert_ne!(next, status);
            prop_assert_ne!(next, RequestStatus::Draft);
        }
    }

    // ========================================================================
    // Rejection and cancellation always land in a terminal status with the
    // hold released; processing is the only path into Processed
    // ========================================================================

    #[test]
    fn prop_reject_cancel_land_terminal(
        status in arb_status(),
    ) {
        for event in [
            WorkflowEvent::SupervisorReject,
            WorkflowEvent::ManagerReject,
            WorkflowEvent::Cancel,
        ] {
            if let Ok(next) = next_status(status, event) {
                prop_assert!(next.is_terminal());
                prop_assert_ne!(next, RequestStatus::Processed);
            }
        }
    }

    #[test]
    fn prop_only_process_reaches_processed(
        status in arb_status(),
        event in arb_event(),
    ) {
        if let Ok(next) = next_status(status, event)
            && next == RequestStatus::Processed
        {
            prop_assert_eq!(event, WorkflowEvent::Process);
            prop_assert_eq!(status, RequestStatus::Approved);
        }
    }

    // ========================================================================
    // Router authority
    // ========================================================================

    /// Process authority is exactly the HR-processing role.
    #[test]
    fn prop_process_requires_hr_admin(role in arb_role()) {
        let request = request_in(RequestStatus::Approved);
        let actor = Actor::new(EmployeeId::new(), role);

        let result = ApprovalRouter::authorize(&request, &actor, WorkflowEvent::Process);
        prop_assert_eq!(result.is_ok(), role >= ActorRole::HrAdmin);
    }

    /// The manager step is open to HR manager and above, never below.
    #[test]
    fn prop_manager_step_requires_hr_manager(role in arb_role()) {
        let request = request_in(RequestStatus::PendingManager);
        let actor = Actor::new(EmployeeId::new(), role);

        for event in [WorkflowEvent::ManagerApprove, WorkflowEvent::ManagerReject] {
            let result = ApprovalRouter::authorize(&request, &actor, event);
            prop_assert_eq!(result.is_ok(), role >= ActorRole::HrManager);
        }
    }

    /// A stranger without elevated role can never drive supervisor steps.
    #[test]
    fn prop_stranger_cannot_act_as_supervisor(role in arb_role()) {
        prop_assume!(role < ActorRole::HrManager);

        let request = request_in(RequestStatus::PendingSupervisor);
        let stranger = Actor::new(EmployeeId::new(), role);

        for event in [
            WorkflowEvent::SupervisorApprove,
            WorkflowEvent::SupervisorReject,
        ] {
            prop_assert!(
                matches!(
                    ApprovalRouter::authorize(&request, &stranger, event),
                    Err(WorkflowError::Forbidden { .. })
                ),
                "expected Forbidden"
            );
        }
    }

    /// Cancellation authority: the owner and HR proxies only.
    #[test]
    fn prop_cancel_is_owner_or_proxy(role in arb_role()) {
        let request = request_in(RequestStatus::PendingSupervisor);

        let owner = Actor::new(request.employee_id, role);
        prop_assert!(ApprovalRouter::authorize(&request, &owner, WorkflowEvent::Cancel).is_ok());

        let stranger = Actor::new(EmployeeId::new(), role);
        let result = ApprovalRouter::authorize(&request, &stranger, WorkflowEvent::Cancel);
        prop_assert_eq!(result.is_ok(), role >= ActorRole::HrAdmin);
    }
}
