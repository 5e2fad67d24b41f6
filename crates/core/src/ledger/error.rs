//! Ledger error types.

use rust_decimal::Decimal;
use talio_shared::types::{EmployeeId, HoldId};
use thiserror::Error;

use super::types::HoldState;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The requested days exceed the available balance.
    #[error("Insufficient balance: {available} days available, {requested} requested")]
    InsufficientBalance {
        /// Days currently available on the row.
        available: Decimal,
        /// Days the caller asked to reserve.
        requested: Decimal,
    },

    /// No ledger row exists for the employee/type/year.
    #[error("No balance row for employee {employee_id}, type {leave_type_code}, year {year}")]
    BalanceNotFound {
        /// The employee.
        employee_id: EmployeeId,
        /// The leave type code.
        leave_type_code: String,
        /// The year.
        year: i32,
    },

    /// A row already exists for the employee/type/year.
    #[error("Balance row already exists for employee {employee_id}, type {leave_type_code}, year {year}")]
    DuplicateBalance {
        /// The employee.
        employee_id: EmployeeId,
        /// The leave type code.
        leave_type_code: String,
        /// The year.
        year: i32,
    },

    /// No hold registered under the given id.
    #[error("Hold {0} not found")]
    HoldNotFound(HoldId),

    /// The hold has already been committed or released.
    #[error("Hold {hold_id} is {state}, expected active")]
    InvalidHoldState {
        /// The hold.
        hold_id: HoldId,
        /// Its current state.
        state: HoldState,
    },

    /// Day amounts for holds must be positive.
    #[error("Day amount must be positive, got {0}")]
    NonPositiveDays(Decimal),

    /// A mutation would break the ledger arithmetic invariant.
    ///
    /// This signals a bug, not a rejected business operation; the caller
    /// side raises a loud operational alert and the operation is refused.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::BalanceNotFound { .. } => "BALANCE_NOT_FOUND",
            Self::DuplicateBalance { .. } => "DUPLICATE_BALANCE",
            Self::HoldNotFound(_) => "HOLD_NOT_FOUND",
            Self::InvalidHoldState { .. } => "INVALID_HOLD_STATE",
            Self::NonPositiveDays(_) => "NON_POSITIVE_DAYS",
            Self::InvariantViolation(_) => "INVARIANT_VIOLATION",
        }
    }
}
