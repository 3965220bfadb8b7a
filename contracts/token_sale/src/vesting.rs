//! # Vesting
//!
//! Entries unlock linearly from the sale end, but nothing is claimable until
//! the cliff has passed:
//!
//! ```text
//! claimable = total − claimed                        if elapsed ≥ vesting_period
//!           = ⌊elapsed · total / vesting_period⌋ − claimed  otherwise
//! elapsed   = now − end_at,  requires now > end_at + cliff_period
//! ```
//!
//! Entries move `Created → PartiallyClaimed → FullyClaimed` and never back.
//! Ownership is transferable and independent of who contributed.

use soroban_sdk::{token, Address, Env, Vec};

use crate::ledger::add;
use crate::math::{from_units, mul_div, to_units};
use crate::types::{Participant, SaleConfig, SaleState, VestingEntry};
use crate::{events, storage, Error};

/// Credit `amount` to the participant's vesting position and return the entry id.
///
/// Extends the latest entry while the participant still owns it, otherwise
/// mints a fresh one and points the record at it.
pub fn credit(
    env: &Env,
    participant: &Address,
    record: &mut Participant,
    amount: i128,
) -> Result<u64, Error> {
    if let Some(id) = record.vesting_entry {
        let mut entry = storage::load_entry(env, id)?;
        if &entry.owner == participant {
            entry.total = add(entry.total, amount)?;
            storage::save_entry(env, &entry);
            return Ok(id);
        }
    }

    let entry = VestingEntry {
        id: storage::next_entry_id(env),
        owner: participant.clone(),
        total: amount,
        claimed: 0,
    };
    storage::save_entry(env, &entry);
    record.vesting_entry = Some(entry.id);
    Ok(entry.id)
}

/// Amount of `entry` that can be claimed at `now`.
pub fn claimable_amount(
    config: &SaleConfig,
    state: &SaleState,
    entry: &VestingEntry,
    now: u64,
) -> Result<i128, Error> {
    if !state.initiated {
        return Err(Error::NotInitiated);
    }
    if now <= state.end_at.saturating_add(config.cliff_period) {
        return Err(Error::NotPastCliff);
    }

    let elapsed = now - state.end_at;
    if elapsed >= config.vesting_period {
        return Ok(entry.total - entry.claimed);
    }

    let unlocked = from_units(mul_div(
        elapsed as u128,
        to_units(entry.total)?,
        config.vesting_period as u128,
    )?)?;
    unlocked
        .checked_sub(entry.claimed)
        .ok_or(Error::ArithmeticOverflow)
}

/// Claim every entry in `entry_ids` on behalf of `owner`; returns the total paid.
pub fn claim(env: &Env, owner: &Address, entry_ids: &Vec<u64>) -> Result<i128, Error> {
    let config = storage::load_config(env)?;
    let state = storage::load_state(env);
    let now = env.ledger().timestamp();
    let offer = token::Client::new(env, &config.offer_token);

    let mut paid = 0i128;
    for id in entry_ids.iter() {
        let mut entry = storage::load_entry(env, id)?;
        if &entry.owner != owner {
            return Err(Error::NotEntryOwner);
        }
        if entry.fully_claimed() {
            return Err(Error::EntryFullyClaimed);
        }
        if !state.reserve_met(&config) {
            return Err(Error::ReserveNotMet);
        }

        let amount = claimable_amount(&config, &state, &entry, now)?;
        if amount > 0 {
            offer.transfer(&env.current_contract_address(), owner, &amount);
            entry.claimed = add(entry.claimed, amount)?;
            storage::save_entry(env, &entry);
            paid = add(paid, amount)?;
        }
        events::emit_vested_claimed(env, id, owner.clone(), amount, entry.claimed);
    }
    Ok(paid)
}

/// Hand `entry_id` over to `to`; amounts are untouched.
pub fn transfer(env: &Env, from: &Address, to: &Address, entry_id: u64) -> Result<(), Error> {
    let mut entry = storage::load_entry(env, entry_id)?;
    if &entry.owner != from {
        return Err(Error::NotEntryOwner);
    }
    entry.owner = to.clone();
    storage::save_entry(env, &entry);
    events::emit_entry_transferred(env, entry_id, from.clone(), to.clone());
    Ok(())
}

/// Preview of [`claimable_amount`] for a stored entry.
pub fn preview(env: &Env, entry_id: u64) -> Result<i128, Error> {
    let config = storage::load_config(env)?;
    let state = storage::load_state(env);
    let entry = storage::load_entry(env, entry_id)?;
    if !state.reserve_met(&config) {
        return Err(Error::ReserveNotMet);
    }
    claimable_amount(&config, &state, &entry, env.ledger().timestamp())
}
