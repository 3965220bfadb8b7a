//! # Sale ledger
//!
//! Contribution bookkeeping: sizing an allocation at the running price,
//! clipping it to the remaining offering, accruing the protocol fee and
//! crediting the participant either directly or through a vesting entry.
//!
//! A contribution that would oversell the offering is cut down to what is
//! left; the payment-equivalent of the excess goes straight back to the
//! participant and the sale ends on the spot. The minimum contribution is
//! checked before that clipping and not again afterwards.

use soroban_sdk::{token, Address, BytesN, Env, Vec};

use crate::curve::{price_at, running_price, stage_at};
use crate::math::{fee_on, offer_to_payment, payment_to_offer};
use crate::types::{Allocation, SaleStage};
use crate::{auth, events, storage, vesting, Error};

/// How a contribution entered the ledger.
pub enum Gate<'a> {
    /// Direct contribution during the open stage.
    Open,
    /// Proof-gated contribution during the restricted stage.
    Restricted {
        proof: &'a Vec<BytesN<32>>,
        cap: i128,
    },
}

pub fn contribute(
    env: &Env,
    participant: &Address,
    amount: i128,
    gate: Gate,
) -> Result<Allocation, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let config = storage::load_config(env)?;
    let mut state = storage::load_state(env);
    let now = env.ledger().timestamp();

    let stage = stage_at(&config, state.timing(), now);
    match (&gate, stage) {
        (_, SaleStage::Pending) => return Err(Error::NotInitiated),
        (_, SaleStage::Ended) => return Err(Error::SaleOver),
        (Gate::Open, SaleStage::Open) | (Gate::Restricted { .. }, SaleStage::Restricted) => {}
        _ => return Err(Error::WrongStage),
    }

    let mut record = storage::load_participant(env, participant);

    let mut amount = match gate {
        Gate::Open => amount,
        Gate::Restricted { proof, cap } => auth::authorized_amount(
            env,
            storage::get_commitment(env),
            participant,
            proof,
            amount,
            cap,
            record.contributed,
        )?,
    };
    if amount < config.min_contribution {
        return Err(Error::BelowMinimum);
    }

    let price = running_price(&config, state.timing(), now)?;
    let payment_decimals = config.payment_decimals();
    let mut allocated = payment_to_offer(amount, price, payment_decimals, config.offer_decimals)?;
    if allocated == 0 {
        return Err(Error::ZeroAllocation);
    }

    let payment = token::Client::new(env, &config.payment.address());
    payment.transfer(participant, &env.current_contract_address(), &amount);

    let remaining = config
        .total_offering
        .checked_sub(state.sold)
        .ok_or(Error::ArithmeticOverflow)?;
    let mut refunded = 0;
    if allocated > remaining {
        let excess = allocated - remaining;
        refunded = offer_to_payment(excess, price, payment_decimals, config.offer_decimals)?;
        amount = amount
            .checked_sub(refunded)
            .ok_or(Error::ArithmeticOverflow)?;
        allocated = remaining;
        if refunded > 0 {
            payment.transfer(&env.current_contract_address(), participant, &refunded);
        }
    }
    let fee = fee_on(amount, config.fee_rate)?;

    state.sold = add(state.sold, allocated)?;
    state.acquired = add(state.acquired, amount)?;
    state.accrued_fee = add(state.accrued_fee, fee)?;
    if state.sold == config.total_offering {
        state.end_at = now;
    }

    record.contributed = add(record.contributed, amount)?;
    let vesting_entry = if config.vesting_enabled() {
        Some(vesting::credit(env, participant, &mut record, allocated)?)
    } else {
        record.allocated = add(record.allocated, allocated)?;
        None
    };

    storage::save_state(env, &state);
    storage::save_participant(env, participant, &record);

    let allocation = Allocation {
        participant: participant.clone(),
        contributed: amount,
        allocated,
        refunded,
        fee,
        vesting_entry,
    };
    events::emit_allocated(env, &allocation);
    Ok(allocation)
}

/// Allocation `amount` would buy at the current price, without side effects.
pub fn quote_allocation(env: &Env, amount: i128) -> Result<i128, Error> {
    let config = storage::load_config(env)?;
    let state = storage::load_state(env);
    let price = price_at(&config, state.timing(), env.ledger().timestamp())?;
    payment_to_offer(amount, price, config.payment_decimals(), config.offer_decimals)
}

/// Payment needed for `offer_amount` at the current price.
pub fn quote_payment(env: &Env, offer_amount: i128) -> Result<i128, Error> {
    let config = storage::load_config(env)?;
    let state = storage::load_state(env);
    let price = price_at(&config, state.timing(), env.ledger().timestamp())?;
    offer_to_payment(offer_amount, price, config.payment_decimals(), config.offer_decimals)
}

pub(crate) fn add(a: i128, b: i128) -> Result<i128, Error> {
    a.checked_add(b).ok_or(Error::ArithmeticOverflow)
}
