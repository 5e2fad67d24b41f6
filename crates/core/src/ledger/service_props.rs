//! Property-based tests for the balance ledger.
//!
//! These validate the ledger arithmetic invariant and the no-double-spend
//! guarantee under randomized operation sequences and real thread
//! interleavings.

use std::sync::Arc;
use std::thread;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use talio_shared::types::{EmployeeId, HoldId};

use crate::audit::MemoryRecorder;
use crate::ledger::error::LedgerError;
use crate::ledger::service::BalanceLedger;
use crate::ledger::types::BalanceKey;

fn ledger() -> BalanceLedger {
    BalanceLedger::new(Arc::new(MemoryRecorder::new()))
}

/// Strategy for half-day-granular amounts in [0.5, 10.0].
fn arb_days() -> impl Strategy<Value = Decimal> {
    (1i64..=20).prop_map(|halves| Decimal::new(halves * 5, 1))
}

/// One step of a randomized ledger run.
#[derive(Debug, Clone)]
enum Op {
    Hold(Decimal),
    ReleaseLast,
    CommitLast,
}

fn arb_ops(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        arb_days().prop_map(Op::Hold),
        Just(Op::ReleaseLast),
        Just(Op::CommitLast),
    ];
    prop::collection::vec(op, 1..=max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Invariant: for all reachable ledger states,
    // earned + carried_forward - used - held >= 0
    // ========================================================================

    #[test]
    fn prop_available_never_negative(
        earned in (0i64..=60).prop_map(|halves| Decimal::new(halves * 5, 1)),
        ops in arb_ops(30),
    ) {
        let ledger = ledger();
        let key = BalanceKey::new(EmployeeId::new(), "VL", 2026);
        ledger.provision(key.clone(), earned).unwrap();

        // Active holds we can settle, with their reserved amounts.
        let mut active: Vec<(HoldId, Decimal)> = Vec::new();

        for op in ops {
            match op {
                Op::Hold(days) => match ledger.hold(&key, days) {
                    Ok(id) => active.push((id, days)),
                    Err(err) => prop_assert!(
                        matches!(err, LedgerError::InsufficientBalance { .. }),
                        "unexpected hold failure: {err}"
                    ),
                },
                Op::ReleaseLast => {
                    if let Some((id, _)) = active.pop() {
                        ledger.release(id).unwrap();
                    }
                }
                Op::CommitLast => {
                    if let Some((id, days)) = active.pop() {
                        ledger.commit(id, days).unwrap();
                    }
                }
            }

            let snapshot = ledger.snapshot(&key).unwrap();
            prop_assert!(snapshot.available_days >= Decimal::ZERO);
            prop_assert!(snapshot.used_days >= Decimal::ZERO);
            prop_assert!(snapshot.held_days >= Decimal::ZERO);

            // held_days always equals the sum of the active holds.
            let reserved: Decimal = active.iter().map(|(_, days)| *days).sum();
            prop_assert_eq!(snapshot.held_days, reserved);
        }
    }

    // ========================================================================
    // Round trip: hold then release restores the exact prior counters
    // ========================================================================

    #[test]
    fn prop_hold_release_round_trip(
        earned in (1i64..=60).prop_map(|halves| Decimal::new(halves * 5, 1)),
        days in arb_days(),
    ) {
        prop_assume!(days <= earned);

        let ledger = ledger();
        let key = BalanceKey::new(EmployeeId::new(), "VL", 2026);
        ledger.provision(key.clone(), earned).unwrap();

        let before = ledger.snapshot(&key).unwrap();
        let hold_id = ledger.hold(&key, days).unwrap();
        ledger.release(hold_id).unwrap();
        let after = ledger.snapshot(&key).unwrap();

        prop_assert_eq!(before, after);
    }

    // ========================================================================
    // Commit conservation: committing moves exactly the held amount
    // ========================================================================

    #[test]
    fn prop_commit_conserves_totals(
        earned in (1i64..=60).prop_map(|halves| Decimal::new(halves * 5, 1)),
        days in arb_days(),
    ) {
        prop_assume!(days <= earned);

        let ledger = ledger();
        let key = BalanceKey::new(EmployeeId::new(), "VL", 2026);
        ledger.provision(key.clone(), earned).unwrap();

        let hold_id = ledger.hold(&key, days).unwrap();
        ledger.commit(hold_id, days).unwrap();
        let snapshot = ledger.snapshot(&key).unwrap();

        prop_assert_eq!(snapshot.used_days, days);
        prop_assert_eq!(snapshot.held_days, Decimal::ZERO);
        prop_assert_eq!(snapshot.available_days, earned - days);
    }
}

// ============================================================================
// No double-spend under real concurrency
// ============================================================================

/// N concurrent holds whose sum exceeds the available balance: at most as
/// many succeed as fit, and the final held counter equals the sum of the
/// successful holds.
#[test]
fn test_concurrent_holds_never_overdraw() {
    let ledger = Arc::new(ledger());
    let key = BalanceKey::new(EmployeeId::new(), "VL", 2026);
    ledger.provision(key.clone(), dec!(7.0)).unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let ledger = Arc::clone(&ledger);
        let key = key.clone();
        handles.push(thread::spawn(move || ledger.hold(&key, dec!(2.0)).is_ok()));
    }

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|&ok| ok)
        .count() as i64;

    // 3 holds of 2.0 fit within 7.0; a fourth would overdraw.
    assert_eq!(successes, 3);

    let snapshot = ledger.snapshot(&key).unwrap();
    assert_eq!(snapshot.held_days, Decimal::from(successes * 2));
    assert_eq!(snapshot.available_days, dec!(1.0));
}

/// Concurrent settlement of distinct holds is race-free: every hold is
/// settled exactly once and the counters balance.
#[test]
fn test_concurrent_settlement_balances() {
    let ledger = Arc::new(ledger());
    let key = BalanceKey::new(EmployeeId::new(), "VL", 2026);
    ledger.provision(key.clone(), dec!(20.0)).unwrap();

    let holds: Vec<_> = (0..10)
        .map(|_| ledger.hold(&key, dec!(2.0)).unwrap())
        .collect();

    let mut handles = Vec::new();
    for (i, hold_id) in holds.into_iter().enumerate() {
        let ledger = Arc::clone(&ledger);
        handles.push(thread::spawn(move || {
            if i % 2 == 0 {
                ledger.commit(hold_id, dec!(2.0)).unwrap();
            } else {
                ledger.release(hold_id).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = ledger.snapshot(&key).unwrap();
    assert_eq!(snapshot.held_days, Decimal::ZERO);
    assert_eq!(snapshot.used_days, dec!(10.0));
    assert_eq!(snapshot.available_days, dec!(10.0));
}
