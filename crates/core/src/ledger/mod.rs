//! Leave balance ledger.
//!
//! One row per (employee, leave type, year) tracks earned, carried-forward,
//! used, and held days. Rows are created at onboarding or year roll-over and
//! only ever mutated through [`BalanceLedger`]; the derived available amount
//! never goes negative.
//!
//! # Modules
//!
//! - `types` - Balance rows, snapshots, holds
//! - `error` - Error types for ledger operations
//! - `service` - The ledger service (hold/commit/release, roll-over)

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::BalanceLedger;
pub use types::{BalanceKey, BalanceSnapshot, Hold, HoldState, LeaveBalance, LedgerOperation};
