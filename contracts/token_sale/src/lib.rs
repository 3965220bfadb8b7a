//! # Token Sale Contract
//!
//! A sponsor offers a fixed supply of an offer asset for a payment asset over
//! a time-boxed sale: an optional restricted stage for proof-gated, capped
//! participants followed by an open stage, each with a linear price curve.
//! The sale succeeds only if the acquired payment reaches the reserve
//! threshold; otherwise every participant is refunded. Allocations are drawn
//! in one piece or, when a vesting period is configured, claimed linearly
//! after a cliff through transferable vesting entries.
//!
//! | Phase          | Entry Point(s)                                                  |
//! |----------------|-----------------------------------------------------------------|
//! | Bootstrap      | [`TokenSale::init`]                                             |
//! | Configuration  | `set_manager`, `set_authorization_commitment`, `set_fee_rate`  |
//! | Start          | [`TokenSale::initiate`]                                         |
//! | Contribution   | `contribute`, `restricted_contribute`                           |
//! | Participant    | `draw_after_success`, `draw_after_failure`, `claim_vested`, `transfer_vesting_entry` |
//! | Sponsor        | [`TokenSale::settle`]                                           |
//! | Queries        | `current_price`, `quote_allocation`, `quote_payment`, `current_stage`, `claimable`, ... |
//!
//! ## Architecture
//!
//! Roles live in [`rbac`], storage in `storage`, events in [`events`]. The
//! economic logic is split across `math` (full-precision conversions),
//! `curve` (price curve), `auth` (inclusion proofs), `ledger`
//! (contributions), `settlement` and `vesting`. This file holds only the
//! public entry points. Every mutating entry point runs under the
//! per-instance re-entrancy lock.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, BytesN, Env, Vec};

pub mod auth;
pub mod curve;
pub mod events;
mod ledger;
pub mod math;
pub mod rbac;
mod settlement;
mod storage;
mod types;
mod vesting;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_support;
#[cfg(test)]
mod test_events;

use curve::StagedSale;
pub use rbac::Role;
use storage::SaleLock;
pub use types::{
    Allocation, PaymentAsset, Participant, SaleConfig, SaleParams, SaleStage, SaleState,
    Settlement, VestingEntry, NATIVE_DECIMALS,
};

/// Longest accepted sale or vesting duration: 5 years.
pub const MAX_DURATION: u64 = 157_680_000;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Configuration
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidDecimals = 3,
    CliffExceedsVesting = 4,
    InvalidDuration = 5,
    InvalidPrice = 6,
    InvalidAmount = 7,
    InvalidFeeRate = 8,
    SameAsset = 9,
    // Authorization
    NotAuthorized = 10,
    InvalidProof = 11,
    CapReached = 12,
    // Timing
    NotInitiated = 13,
    AlreadyInitiated = 14,
    SaleOver = 15,
    WrongStage = 16,
    SaleNotActive = 17,
    SaleNotEnded = 18,
    NotPastCliff = 19,
    // Contribution
    BelowMinimum = 20,
    ZeroAllocation = 21,
    // Arithmetic
    DivisionByZero = 22,
    ArithmeticOverflow = 23,
    // Settlement and replay
    AlreadySettled = 24,
    NothingToDraw = 25,
    VestingEnabled = 26,
    ReserveNotMet = 27,
    ReserveMet = 28,
    EntryNotFound = 29,
    NotEntryOwner = 30,
    EntryFullyClaimed = 31,
    Reentrant = 32,
}

#[contract]
pub struct TokenSale;

#[contractimpl]
impl TokenSale {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Configure the sale. Must be called exactly once after deployment.
    ///
    /// - `sponsor` must sign; it will fund the offering and receive proceeds.
    /// - `protocol` receives the protocol fee.
    /// - The minimum contribution is derived as `10^(payment_decimals / 2)`.
    pub fn init(env: Env, sponsor: Address, protocol: Address, params: SaleParams) -> Result<(), Error> {
        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        sponsor.require_auth();
        validate_params(&params)?;

        let min_contribution = math::min_contribution(params.payment.decimals())?;
        let config = SaleConfig::from_params(params, min_contribution);

        rbac::init_roles(&env, &sponsor, &protocol);
        storage::save_config(&env, &config);
        storage::save_state(&env, &SaleState::default());

        events::emit_initialized(&env, sponsor, config.offer_token);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────

    /// Appoint the manager. Sponsor only.
    pub fn set_manager(env: Env, caller: Address, manager: Address) {
        caller.require_auth();
        rbac::set_manager(&env, &caller, &manager);
    }

    /// Publish or replace the restricted-stage commitment. Sponsor or manager,
    /// before initiation only.
    pub fn set_authorization_commitment(env: Env, caller: Address, root: BytesN<32>) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_sponsor_or_manager(&env, &caller);
        if storage::load_state(&env).initiated {
            return Err(Error::AlreadyInitiated);
        }
        storage::set_commitment(&env, &root);
        events::emit_commitment_set(&env, root, caller);
        Ok(())
    }

    /// Change the protocol fee rate. Protocol only, before initiation only.
    pub fn set_fee_rate(env: Env, caller: Address, fee_rate: u128) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_role(&env, &caller, &Role::Protocol);
        if fee_rate > math::FEE_SCALE {
            return Err(Error::InvalidFeeRate);
        }
        if storage::load_state(&env).initiated {
            return Err(Error::AlreadyInitiated);
        }
        let mut config = storage::load_config(&env)?;
        config.fee_rate = fee_rate;
        storage::save_config(&env, &config);
        events::emit_fee_rate_set(&env, fee_rate);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Sale lifecycle
    // ─────────────────────────────────────────────────────────

    /// Lock the configuration, pull the offering into custody and start the clock.
    pub fn initiate(env: Env, caller: Address) -> Result<(), Error> {
        caller.require_auth();
        rbac::require_role(&env, &caller, &Role::Sponsor);
        let _lock = SaleLock::acquire(&env)?;

        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env);
        if state.initiated {
            return Err(Error::AlreadyInitiated);
        }

        let now = env.ledger().timestamp();
        state.initiated = true;
        state.initiated_at = now;
        state.end_at = now
            .checked_add(config.sale_duration())
            .ok_or(Error::ArithmeticOverflow)?;
        storage::save_state(&env, &state);

        token::Client::new(&env, &config.offer_token).transfer(
            &caller,
            &env.current_contract_address(),
            &config.total_offering,
        );

        events::emit_initiated(&env, state.initiated_at, state.end_at, config.total_offering);
        Ok(())
    }

    /// Contribute `amount` of the payment asset during the open stage.
    pub fn contribute(env: Env, participant: Address, amount: i128) -> Result<Allocation, Error> {
        participant.require_auth();
        let _lock = SaleLock::acquire(&env)?;
        ledger::contribute(&env, &participant, amount, ledger::Gate::Open)
    }

    /// Contribute during the restricted stage, proving `(participant, cap)`
    /// against the published commitment. The amount is clipped to what is
    /// left under `cap`.
    pub fn restricted_contribute(
        env: Env,
        participant: Address,
        proof: Vec<BytesN<32>>,
        amount: i128,
        cap: i128,
    ) -> Result<Allocation, Error> {
        participant.require_auth();
        let _lock = SaleLock::acquire(&env)?;
        ledger::contribute(
            &env,
            &participant,
            amount,
            ledger::Gate::Restricted { proof: &proof, cap },
        )
    }

    /// Draw the full allocation after a successful, non-vesting sale.
    pub fn draw_after_success(env: Env, participant: Address) -> Result<i128, Error> {
        participant.require_auth();
        let _lock = SaleLock::acquire(&env)?;
        settlement::draw_after_success(&env, &participant)
    }

    /// Draw a full refund after a failed sale.
    pub fn draw_after_failure(env: Env, participant: Address) -> Result<i128, Error> {
        participant.require_auth();
        let _lock = SaleLock::acquire(&env)?;
        settlement::draw_after_failure(&env, &participant)
    }

    /// Claim the unlocked part of each listed vesting entry owned by `owner`.
    pub fn claim_vested(env: Env, owner: Address, entry_ids: Vec<u64>) -> Result<i128, Error> {
        owner.require_auth();
        let _lock = SaleLock::acquire(&env)?;
        vesting::claim(&env, &owner, &entry_ids)
    }

    /// Transfer ownership of a vesting entry.
    pub fn transfer_vesting_entry(env: Env, from: Address, to: Address, entry_id: u64) -> Result<(), Error> {
        from.require_auth();
        let _lock = SaleLock::acquire(&env)?;
        vesting::transfer(&env, &from, &to, entry_id)
    }

    /// Settle the sponsor side once the sale has ended. Sponsor or manager;
    /// funds always go to the sponsor.
    pub fn settle(env: Env, caller: Address) -> Result<Settlement, Error> {
        caller.require_auth();
        rbac::require_sponsor_or_manager(&env, &caller);
        let _lock = SaleLock::acquire(&env)?;
        settlement::settle(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_config(env: Env) -> Result<SaleConfig, Error> {
        storage::load_config(&env)
    }

    pub fn get_state(env: Env) -> SaleState {
        storage::load_state(&env)
    }

    pub fn get_participant(env: Env, participant: Address) -> Participant {
        storage::load_participant(&env, &participant)
    }

    pub fn get_vesting_entry(env: Env, entry_id: u64) -> Result<VestingEntry, Error> {
        storage::load_entry(&env, entry_id)
    }

    pub fn get_commitment(env: Env) -> Option<BytesN<32>> {
        storage::get_commitment(&env)
    }

    pub fn min_contribution(env: Env) -> Result<i128, Error> {
        Ok(storage::load_config(&env)?.min_contribution)
    }

    /// Current price (18-decimal fixed point).
    pub fn current_price(env: Env) -> Result<u128, Error> {
        let config = storage::load_config(&env)?;
        let state = storage::load_state(&env);
        curve::price_at(&config, state.timing(), env.ledger().timestamp())
    }

    pub fn current_stage(env: Env) -> Result<SaleStage, Error> {
        let config = storage::load_config(&env)?;
        let state = storage::load_state(&env);
        Ok(curve::stage_at(&config, state.timing(), env.ledger().timestamp()))
    }

    /// Offer-asset units `amount` of payment would buy right now.
    pub fn quote_allocation(env: Env, amount: i128) -> Result<i128, Error> {
        ledger::quote_allocation(&env, amount)
    }

    /// Payment-asset units worth `offer_amount` right now.
    pub fn quote_payment(env: Env, offer_amount: i128) -> Result<i128, Error> {
        ledger::quote_payment(&env, offer_amount)
    }

    /// What `claim_vested` would pay for `entry_id` right now.
    pub fn claimable(env: Env, entry_id: u64) -> Result<i128, Error> {
        vesting::preview(&env, entry_id)
    }

    pub fn reserve_met(env: Env) -> Result<bool, Error> {
        let config = storage::load_config(&env)?;
        Ok(storage::load_state(&env).reserve_met(&config))
    }

    pub fn role_of(env: Env, address: Address) -> Option<Role> {
        rbac::role_of(&env, address)
    }

    pub fn has_role(env: Env, address: Address, role: Role) -> bool {
        rbac::has_role(&env, address, role)
    }
}

fn validate_params(params: &SaleParams) -> Result<(), Error> {
    if params.offer_decimals > math::MAX_DECIMALS || params.payment.decimals() > math::MAX_DECIMALS {
        return Err(Error::InvalidDecimals);
    }
    if params.offer_token == params.payment.address() {
        return Err(Error::SameAsset);
    }
    if params.cliff_period > params.vesting_period {
        return Err(Error::CliffExceedsVesting);
    }
    if params.vesting_period > MAX_DURATION {
        return Err(Error::InvalidDuration);
    }
    let sale_duration = params
        .restricted_duration
        .checked_add(params.open_duration)
        .ok_or(Error::InvalidDuration)?;
    if sale_duration == 0 || sale_duration > MAX_DURATION {
        return Err(Error::InvalidDuration);
    }
    if params.restricted_duration > 0
        && (params.restricted_start_price == 0 || params.restricted_end_price == 0)
    {
        return Err(Error::InvalidPrice);
    }
    if params.open_duration > 0 && (params.open_start_price == 0 || params.open_end_price == 0) {
        return Err(Error::InvalidPrice);
    }
    if params.total_offering <= 0 || params.reserve_threshold < 0 {
        return Err(Error::InvalidAmount);
    }
    if params.fee_rate > math::FEE_SCALE {
        return Err(Error::InvalidFeeRate);
    }
    Ok(())
}
