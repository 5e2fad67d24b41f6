//! The balance ledger service.
//!
//! All mutations of leave balances flow through [`BalanceLedger`]. The
//! read-check-write for a hold happens inside a single exclusive map-entry
//! guard, so concurrent holds against the same row are linearizable and can
//! never jointly overdraw it. Operations on different rows proceed in
//! parallel.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use talio_shared::types::{EmployeeId, HoldId};
use tracing::{debug, error, warn};

use super::error::LedgerError;
use super::types::{BalanceKey, BalanceSnapshot, Hold, HoldState, LeaveBalance, LedgerOperation};
use crate::audit::{AuditEvent, AuditEventKind, AuditRecorder};
use crate::policy::LeaveType;

/// The per-employee, per-leave-type, per-year balance ledger.
pub struct BalanceLedger {
    rows: DashMap<BalanceKey, LeaveBalance>,
    holds: DashMap<HoldId, Hold>,
    recorder: Arc<dyn AuditRecorder>,
}

impl BalanceLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new(recorder: Arc<dyn AuditRecorder>) -> Self {
        Self {
            rows: DashMap::new(),
            holds: DashMap::new(),
            recorder,
        }
    }

    /// Creates a row at onboarding with the given entitlement.
    ///
    /// # Errors
    ///
    /// `DuplicateBalance` if the row already exists, `NonPositiveDays` if
    /// `earned_days` is negative (zero is allowed, e.g. unpaid leave types).
    pub fn provision(
        &self,
        key: BalanceKey,
        earned_days: Decimal,
    ) -> Result<BalanceSnapshot, LedgerError> {
        if earned_days < Decimal::ZERO {
            return Err(LedgerError::NonPositiveDays(earned_days));
        }
        self.insert_row(key, LeaveBalance::new(earned_days, Decimal::ZERO), LedgerOperation::Provision)
    }

    /// Creates the row for `year` from the prior year's leftover balance.
    ///
    /// Carry-forward is the prior year's available days capped at the leave
    /// type's `max_carryover_days`, or zero when the type does not carry
    /// forward. The prior year's row is left untouched; it is superseded,
    /// never deleted.
    ///
    /// # Errors
    ///
    /// `BalanceNotFound` if no prior-year row exists, `DuplicateBalance` if
    /// the target row already exists.
    pub fn rollover_year(
        &self,
        employee_id: EmployeeId,
        leave_type: &LeaveType,
        year: i32,
    ) -> Result<BalanceSnapshot, LedgerError> {
        let prior_key = BalanceKey::new(employee_id, leave_type.code.clone(), year - 1);
        let leftover = self.available(&prior_key)?;
        let carried = leave_type.carryover_for(leftover);

        let key = BalanceKey::new(employee_id, leave_type.code.clone(), year);
        self.insert_row(
            key,
            LeaveBalance::new(leave_type.annual_entitlement_days, carried),
            LedgerOperation::Rollover,
        )
    }

    /// Days still available on a row.
    ///
    /// # Errors
    ///
    /// `BalanceNotFound` if no row exists; callers must provision one at
    /// onboarding or year roll-over.
    pub fn available(&self, key: &BalanceKey) -> Result<Decimal, LedgerError> {
        self.rows
            .get(key)
            .map(|row| row.available_days())
            .ok_or_else(|| Self::not_found(key))
    }

    /// Point-in-time view of all four counters.
    ///
    /// # Errors
    ///
    /// `BalanceNotFound` if no row exists.
    pub fn snapshot(&self, key: &BalanceKey) -> Result<BalanceSnapshot, LedgerError> {
        self.rows
            .get(key)
            .map(|row| row.snapshot())
            .ok_or_else(|| Self::not_found(key))
    }

    /// Reserves `days` against a row.
    ///
    /// Atomically verifies `available >= days` and increments the held
    /// counter; the check and the write happen under one exclusive row
    /// guard.
    ///
    /// # Errors
    ///
    /// `InsufficientBalance` when the row cannot cover the reservation,
    /// `NonPositiveDays` when `days <= 0`, `BalanceNotFound` when the row
    /// is absent.
    pub fn hold(&self, key: &BalanceKey, days: Decimal) -> Result<HoldId, LedgerError> {
        if days <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveDays(days));
        }

        let hold_id = HoldId::new();
        let (before, after) = {
            let mut row = self
                .rows
                .get_mut(key)
                .ok_or_else(|| Self::not_found(key))?;

            let available = row.available_days();
            if available < days {
                return Err(LedgerError::InsufficientBalance {
                    available,
                    requested: days,
                });
            }

            let before = row.snapshot();
            row.held_days += days;
            (before, row.snapshot())
        };

        self.holds.insert(
            hold_id,
            Hold {
                id: hold_id,
                key: key.clone(),
                days,
                state: HoldState::Active,
            },
        );

        debug!(%hold_id, days = %days, "placed balance hold");
        self.emit(key.clone(), LedgerOperation::Hold, Some(hold_id), Some(before), after);
        Ok(hold_id)
    }

    /// Converts a hold into a permanent deduction.
    ///
    /// `actual_days` must equal the held amount; partial commits are not
    /// supported and are refused as an invariant violation.
    ///
    /// # Errors
    ///
    /// `HoldNotFound`, `InvalidHoldState` if the hold is not active, or
    /// `InvariantViolation` on an amount mismatch. Counters are untouched
    /// on every error path.
    pub fn commit(&self, hold_id: HoldId, actual_days: Decimal) -> Result<(), LedgerError> {
        self.settle(hold_id, HoldState::Committed, Some(actual_days))
    }

    /// Cancels a hold without deducting.
    ///
    /// # Errors
    ///
    /// `HoldNotFound`, or `InvalidHoldState` if the hold was already
    /// committed or released; the second call leaves counters unchanged.
    pub fn release(&self, hold_id: HoldId) -> Result<(), LedgerError> {
        self.settle(hold_id, HoldState::Released, None)
    }

    /// Shared hold settlement: release frees the held days, commit also
    /// moves them into `used_days`.
    fn settle(
        &self,
        hold_id: HoldId,
        target: HoldState,
        actual_days: Option<Decimal>,
    ) -> Result<(), LedgerError> {
        // Lock order is holds -> rows everywhere; `hold()` drops its row
        // guard before touching the holds map.
        let mut hold = self
            .holds
            .get_mut(&hold_id)
            .ok_or(LedgerError::HoldNotFound(hold_id))?;

        if hold.state != HoldState::Active {
            return Err(LedgerError::InvalidHoldState {
                hold_id,
                state: hold.state,
            });
        }

        if let Some(actual) = actual_days
            && actual != hold.days
        {
            error!(
                %hold_id,
                held = %hold.days,
                actual = %actual,
                "commit amount disagrees with held amount"
            );
            return Err(LedgerError::InvariantViolation(format!(
                "commit of {actual} days does not match held amount {} for hold {hold_id}",
                hold.days
            )));
        }

        let (before, after) = {
            let mut row = self
                .rows
                .get_mut(&hold.key)
                .ok_or_else(|| Self::not_found(&hold.key))?;

            if row.held_days < hold.days {
                error!(%hold_id, held_days = %row.held_days, "row holds fewer days than the hold reserves");
                return Err(LedgerError::InvariantViolation(format!(
                    "row holds {} days but hold {hold_id} reserves {}",
                    row.held_days, hold.days
                )));
            }

            let before = row.snapshot();
            row.held_days -= hold.days;
            if let Some(actual) = actual_days {
                row.used_days += actual;
            }
            (before, row.snapshot())
        };

        hold.state = target;
        let key = hold.key.clone();
        drop(hold);

        let operation = match target {
            HoldState::Committed => LedgerOperation::Commit,
            _ => LedgerOperation::Release,
        };
        debug!(%hold_id, state = %target, "settled balance hold");
        self.emit(key, operation, Some(hold_id), Some(before), after);
        Ok(())
    }

    fn insert_row(
        &self,
        key: BalanceKey,
        row: LeaveBalance,
        operation: LedgerOperation,
    ) -> Result<BalanceSnapshot, LedgerError> {
        match self.rows.entry(key.clone()) {
            Entry::Occupied(_) => Err(LedgerError::DuplicateBalance {
                employee_id: key.employee_id,
                leave_type_code: key.leave_type_code,
                year: key.year,
            }),
            Entry::Vacant(vacant) => {
                let snapshot = row.snapshot();
                vacant.insert(row);
                self.emit(key, operation, None, None, snapshot);
                Ok(snapshot)
            }
        }
    }

    fn not_found(key: &BalanceKey) -> LedgerError {
        LedgerError::BalanceNotFound {
            employee_id: key.employee_id,
            leave_type_code: key.leave_type_code.clone(),
            year: key.year,
        }
    }

    fn emit(
        &self,
        key: BalanceKey,
        operation: LedgerOperation,
        hold_id: Option<HoldId>,
        before: Option<BalanceSnapshot>,
        after: BalanceSnapshot,
    ) {
        let event = AuditEvent::new(AuditEventKind::LedgerMutated {
            key,
            operation,
            hold_id,
            before,
            after,
        });
        if let Err(err) = self.recorder.record(event) {
            warn!(error = %err, "audit recorder failed, continuing without audit trail");
        }
    }
}
