//! Leave request lifecycle management.
//!
//! This module implements the leave request state machine, the approval
//! router, and the workflow engine that ties requests to the balance
//! ledger. Every transition is one atomic unit: state change, ledger
//! effect, and audit event together, or nothing.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (statuses, events, transitions)
//! - `request` - The leave request entity
//! - `error` - Workflow-specific error types
//! - `router` - Actor roles and approval authorization
//! - `service` - The workflow engine

pub mod error;
pub mod request;
pub mod router;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use request::{LeaveRequest, SubmitLeave};
pub use router::{Actor, ActorRole, ApprovalRouter, RequiredApprover};
pub use service::{LeaveWorkflowEngine, next_status};
pub use types::{RequestFilter, RequestStatus, StateTransition, WorkflowEvent};
