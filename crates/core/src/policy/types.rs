//! Leave type definitions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A leave type granted by the organization.
///
/// Immutable once referenced by a committed ledger entry for a closed year;
/// the catalog therefore exposes leave types by shared reference only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveType {
    /// Unique leave type code (e.g. "VL").
    pub code: String,
    /// Days granted per year.
    pub annual_entitlement_days: Decimal,
    /// Maximum days carried into the next year.
    pub max_carryover_days: Decimal,
    /// Whether unused days carry into the next year.
    pub carry_forward_allowed: bool,
    /// Whether leave of this type is paid.
    pub is_paid: bool,
}

impl LeaveType {
    /// Carry-over granted for a given leftover balance.
    ///
    /// Zero when the type does not allow carry-forward, otherwise the
    /// leftover capped at `max_carryover_days`.
    #[must_use]
    pub fn carryover_for(&self, leftover: Decimal) -> Decimal {
        if !self.carry_forward_allowed || leftover <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        leftover.min(self.max_carryover_days)
    }
}
