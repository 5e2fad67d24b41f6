//! Policy error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur when building or querying the policy catalog.
#[derive(Debug, Error)]
pub enum PolicyError {
    /// No leave type registered under the given code.
    #[error("Unknown leave type: {0}")]
    UnknownLeaveType(String),

    /// Two leave types registered under the same code.
    #[error("Duplicate leave type: {0}")]
    DuplicateLeaveType(String),

    /// Entitlement or carry-over days must not be negative.
    #[error("Invalid entitlement for leave type {code}: {days}")]
    InvalidEntitlement {
        /// The offending leave type code.
        code: String,
        /// The negative day count.
        days: Decimal,
    },

    /// Leave type code must not be empty.
    #[error("Leave type code must not be empty")]
    EmptyCode,
}

impl PolicyError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownLeaveType(_) => "UNKNOWN_LEAVE_TYPE",
            Self::DuplicateLeaveType(_) => "DUPLICATE_LEAVE_TYPE",
            Self::InvalidEntitlement { .. } => "INVALID_ENTITLEMENT",
            Self::EmptyCode => "EMPTY_LEAVE_TYPE_CODE",
        }
    }
}
