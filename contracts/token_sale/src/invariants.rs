#![allow(dead_code)]

extern crate std;

use crate::types::{Participant, SaleConfig, SaleStage, SaleState, VestingEntry};

/// Sold offer never exceeds what was put up for sale.
pub fn assert_sold_within_offering(config: &SaleConfig, state: &SaleState) {
    assert!(
        state.sold >= 0 && state.sold <= config.total_offering,
        "sold {} outside [0, {}]",
        state.sold,
        config.total_offering
    );
}

/// The fee is a share of what was acquired, never more.
pub fn assert_fee_within_acquired(state: &SaleState) {
    assert!(
        state.accrued_fee >= 0 && state.accrued_fee <= state.acquired,
        "fee {} exceeds acquired {}",
        state.accrued_fee,
        state.acquired
    );
}

/// A sale that sold out has its end moved to the sell-out moment.
pub fn assert_sold_out_ended(config: &SaleConfig, state: &SaleState, now: u64) {
    if state.sold == config.total_offering {
        assert!(
            state.end_at <= now,
            "sold out but end_at {} is after {}",
            state.end_at,
            now
        );
    }
}

/// Per-participant records add up to the aggregates.
///
/// `allocations` holds, per participant, either the un-drawn allocation or
/// the vesting entry total, whichever applies.
pub fn assert_conservation(state: &SaleState, records: &[Participant], allocations: &[i128]) {
    let contributed: i128 = records.iter().map(|r| r.contributed).sum();
    let allocated: i128 = allocations.iter().sum();
    assert_eq!(
        contributed, state.acquired,
        "participant contributions {} != acquired {}",
        contributed, state.acquired
    );
    assert_eq!(
        allocated, state.sold,
        "participant allocations {} != sold {}",
        allocated, state.sold
    );
}

/// Claimed never exceeds the entry total.
pub fn assert_entry_within_total(entry: &VestingEntry) {
    assert!(
        entry.claimed >= 0 && entry.claimed <= entry.total,
        "entry {} claimed {} of {}",
        entry.id,
        entry.claimed,
        entry.total
    );
}

/// Stages only move forward:
///   Pending -> Restricted | Open | Ended
///   Restricted -> Open | Ended
///   Open -> Ended
pub fn assert_valid_stage_transition(from: SaleStage, to: SaleStage) {
    let valid = from == to
        || matches!(
            (from, to),
            (SaleStage::Pending, _)
                | (SaleStage::Restricted, SaleStage::Open)
                | (SaleStage::Restricted, SaleStage::Ended)
                | (SaleStage::Open, SaleStage::Ended)
        );
    assert!(valid, "invalid stage transition from {:?} to {:?}", from, to);
}

/// Run all stateless sale invariants.
pub fn assert_all_sale_invariants(config: &SaleConfig, state: &SaleState, now: u64) {
    assert_sold_within_offering(config, state);
    assert_fee_within_acquired(state);
    assert_sold_out_ended(config, state, now);
}
