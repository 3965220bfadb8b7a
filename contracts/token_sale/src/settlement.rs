//! # Settlement
//!
//! Once the sale window has closed, `acquired` against `reserve_threshold`
//! picks exactly one branch for good: contributions stop at the end time, so
//! neither side of the comparison can change afterwards.
//!
//! | Branch  | Participants                                 | Sponsor                                 |
//! |---------|----------------------------------------------|-----------------------------------------|
//! | Success | draw allocation (or claim vesting entries)   | proceeds minus fee, fee to protocol, unsold offer back |
//! | Failure | draw full refund of their contribution       | whole offer-asset custody back          |

use soroban_sdk::{token, Address, Env};

use crate::types::{SaleConfig, SaleState, Settlement};
use crate::{events, rbac, storage, Error};

fn require_ended(env: &Env) -> Result<(SaleConfig, SaleState), Error> {
    let config = storage::load_config(env)?;
    let state = storage::load_state(env);
    if !state.initiated {
        return Err(Error::NotInitiated);
    }
    if env.ledger().timestamp() <= state.end_at {
        return Err(Error::SaleNotEnded);
    }
    Ok((config, state))
}

/// Pay out a non-vesting participant's allocation after a successful sale.
pub fn draw_after_success(env: &Env, participant: &Address) -> Result<i128, Error> {
    let (config, state) = require_ended(env)?;
    if !state.reserve_met(&config) {
        return Err(Error::ReserveNotMet);
    }
    if config.vesting_enabled() {
        return Err(Error::VestingEnabled);
    }

    let mut record = storage::load_participant(env, participant);
    let amount = record.allocated;
    if amount == 0 {
        return Err(Error::NothingToDraw);
    }
    record.allocated = 0;
    storage::save_participant(env, participant, &record);

    token::Client::new(env, &config.offer_token).transfer(
        &env.current_contract_address(),
        participant,
        &amount,
    );
    events::emit_drawn(env, participant.clone(), amount);
    Ok(amount)
}

/// Refund a participant's whole contribution after a failed sale.
pub fn draw_after_failure(env: &Env, participant: &Address) -> Result<i128, Error> {
    let (config, state) = require_ended(env)?;
    if state.reserve_met(&config) {
        return Err(Error::ReserveMet);
    }

    let mut record = storage::load_participant(env, participant);
    let amount = record.contributed;
    if amount == 0 {
        return Err(Error::NothingToDraw);
    }
    record.contributed = 0;
    record.allocated = 0;
    storage::save_participant(env, participant, &record);

    token::Client::new(env, &config.payment.address()).transfer(
        &env.current_contract_address(),
        participant,
        &amount,
    );
    events::emit_refunded(env, participant.clone(), amount);
    Ok(amount)
}

/// Sponsor-side settlement, at most once.
pub fn settle(env: &Env) -> Result<Settlement, Error> {
    let (config, mut state) = require_ended(env)?;
    if state.sponsor_settled {
        return Err(Error::AlreadySettled);
    }
    state.sponsor_settled = true;
    storage::save_state(env, &state);

    let sponsor = rbac::sponsor(env);
    let this = env.current_contract_address();
    let offer = token::Client::new(env, &config.offer_token);

    let settlement = if state.reserve_met(&config) {
        let proceeds = state
            .acquired
            .checked_sub(state.accrued_fee)
            .ok_or(Error::ArithmeticOverflow)?;
        let unsold = config
            .total_offering
            .checked_sub(state.sold)
            .ok_or(Error::ArithmeticOverflow)?;

        let payment = token::Client::new(env, &config.payment.address());
        if proceeds > 0 {
            payment.transfer(&this, &sponsor, &proceeds);
        }
        if state.accrued_fee > 0 {
            payment.transfer(&this, &rbac::protocol(env), &state.accrued_fee);
        }
        if unsold > 0 {
            offer.transfer(&this, &sponsor, &unsold);
        }
        Settlement {
            reserve_met: true,
            proceeds,
            fee: state.accrued_fee,
            offer_returned: unsold,
        }
    } else {
        let custody = offer.balance(&this);
        if custody > 0 {
            offer.transfer(&this, &sponsor, &custody);
        }
        Settlement {
            reserve_met: false,
            proceeds: 0,
            fee: 0,
            offer_returned: custody,
        }
    };

    events::emit_settled(env, &settlement);
    Ok(settlement)
}
