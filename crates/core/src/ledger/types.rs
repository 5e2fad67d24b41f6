//! Ledger domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use talio_shared::types::{EmployeeId, HoldId};

/// Key of a ledger row: one balance per employee, leave type, and year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceKey {
    /// The employee the balance belongs to.
    pub employee_id: EmployeeId,
    /// The leave type code (e.g. "VL").
    pub leave_type_code: String,
    /// The calendar year the balance covers.
    pub year: i32,
}

impl BalanceKey {
    /// Creates a new balance key.
    #[must_use]
    pub fn new(employee_id: EmployeeId, leave_type_code: impl Into<String>, year: i32) -> Self {
        Self {
            employee_id,
            leave_type_code: leave_type_code.into(),
            year,
        }
    }
}

/// A ledger row: the four counters for one employee/leave-type/year.
///
/// Invariant: all counters are non-negative and
/// `earned + carried_forward - used - held >= 0` at all times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// Days granted for the year.
    pub earned_days: Decimal,
    /// Days carried forward from the prior year.
    pub carried_forward_days: Decimal,
    /// Days permanently deducted.
    pub used_days: Decimal,
    /// Days reserved by pending requests, not yet committed.
    pub held_days: Decimal,
}

impl LeaveBalance {
    /// Creates a fresh row with no usage.
    #[must_use]
    pub fn new(earned_days: Decimal, carried_forward_days: Decimal) -> Self {
        Self {
            earned_days,
            carried_forward_days,
            used_days: Decimal::ZERO,
            held_days: Decimal::ZERO,
        }
    }

    /// Days still available for new requests.
    #[must_use]
    pub fn available_days(&self) -> Decimal {
        self.earned_days + self.carried_forward_days - self.used_days - self.held_days
    }

    /// Returns true if every counter invariant holds.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.used_days >= Decimal::ZERO
            && self.held_days >= Decimal::ZERO
            && self.available_days() >= Decimal::ZERO
    }

    /// Point-in-time copy of the counters.
    #[must_use]
    pub fn snapshot(&self) -> BalanceSnapshot {
        BalanceSnapshot {
            earned_days: self.earned_days,
            carried_forward_days: self.carried_forward_days,
            used_days: self.used_days,
            held_days: self.held_days,
            available_days: self.available_days(),
        }
    }
}

/// Point-in-time view of a ledger row, including the derived available amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Days granted for the year.
    pub earned_days: Decimal,
    /// Days carried forward from the prior year.
    pub carried_forward_days: Decimal,
    /// Days permanently deducted.
    pub used_days: Decimal,
    /// Days reserved by pending requests.
    pub held_days: Decimal,
    /// Days still available for new requests.
    pub available_days: Decimal,
}

/// Lifecycle state of a hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HoldState {
    /// The hold reserves days against the row.
    Active,
    /// The hold was converted into a permanent deduction.
    Committed,
    /// The hold was cancelled without deduction.
    Released,
}

impl HoldState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Committed => "committed",
            Self::Released => "released",
        }
    }
}

impl std::fmt::Display for HoldState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reservation against a ledger row.
///
/// The hold is a relation to its request by id; releasing or committing it
/// is driven exclusively by the request's state transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    /// Unique identifier.
    pub id: HoldId,
    /// The row the hold reserves against.
    pub key: BalanceKey,
    /// Days reserved.
    pub days: Decimal,
    /// Current lifecycle state.
    pub state: HoldState,
}

/// The mutating ledger operations, for audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerOperation {
    /// Row created at onboarding.
    Provision,
    /// Row created at year roll-over.
    Rollover,
    /// Days reserved by a pending request.
    Hold,
    /// A hold converted into a permanent deduction.
    Commit,
    /// A hold cancelled without deduction.
    Release,
}
