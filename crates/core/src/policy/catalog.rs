//! The leave policy catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;
use talio_shared::config::PolicyConfig;

use super::error::PolicyError;
use super::types::LeaveType;

/// Read-only catalog of the leave types the organization grants.
///
/// Built once at startup (from configuration or in code) and consulted by
/// the ledger for roll-over rules and by the workflow engine to validate
/// submissions.
#[derive(Debug, Default)]
pub struct PolicyCatalog {
    leave_types: HashMap<String, LeaveType>,
}

impl PolicyCatalog {
    /// Builds a catalog from a list of leave types.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError` if a code is empty or duplicated, or an
    /// entitlement/carry-over amount is negative.
    pub fn new(leave_types: Vec<LeaveType>) -> Result<Self, PolicyError> {
        let mut map = HashMap::with_capacity(leave_types.len());
        for lt in leave_types {
            Self::validate(&lt)?;
            let code = lt.code.clone();
            if map.insert(code.clone(), lt).is_some() {
                return Err(PolicyError::DuplicateLeaveType(code));
            }
        }
        Ok(Self { leave_types: map })
    }

    /// Builds a catalog from the `policy` configuration section.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError` under the same conditions as [`Self::new`].
    pub fn from_config(config: &PolicyConfig) -> Result<Self, PolicyError> {
        let leave_types = config
            .leave_types
            .iter()
            .map(|setting| LeaveType {
                code: setting.code.clone(),
                annual_entitlement_days: setting.annual_entitlement_days,
                max_carryover_days: setting.max_carryover_days,
                carry_forward_allowed: setting.carry_forward_allowed,
                is_paid: setting.is_paid,
            })
            .collect();
        Self::new(leave_types)
    }

    /// Looks up a leave type by code.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::UnknownLeaveType` if the code is not registered.
    pub fn get(&self, code: &str) -> Result<&LeaveType, PolicyError> {
        self.leave_types
            .get(code)
            .ok_or_else(|| PolicyError::UnknownLeaveType(code.to_string()))
    }

    /// Returns true if the code is registered.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.leave_types.contains_key(code)
    }

    /// Iterates over all registered leave types.
    pub fn iter(&self) -> impl Iterator<Item = &LeaveType> {
        self.leave_types.values()
    }

    fn validate(lt: &LeaveType) -> Result<(), PolicyError> {
        if lt.code.trim().is_empty() {
            return Err(PolicyError::EmptyCode);
        }
        if lt.annual_entitlement_days < Decimal::ZERO {
            return Err(PolicyError::InvalidEntitlement {
                code: lt.code.clone(),
                days: lt.annual_entitlement_days,
            });
        }
        if lt.max_carryover_days < Decimal::ZERO {
            return Err(PolicyError::InvalidEntitlement {
                code: lt.code.clone(),
                days: lt.max_carryover_days,
            });
        }
        Ok(())
    }
}
