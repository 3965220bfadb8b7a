use soroban_sdk::{contracttype, symbol_short, Address, BytesN, Env};

use crate::types::{Allocation, Settlement};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleInitiated {
    pub initiated_at: u64,
    pub end_at: u64,
    pub total_offering: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitmentSet {
    pub root: BytesN<32>,
    pub by: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeRateSet {
    pub fee_rate: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Drawn {
    pub participant: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestedClaimed {
    pub entry_id: u64,
    pub owner: Address,
    pub amount: i128,
    pub claimed: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EntryTransferred {
    pub entry_id: u64,
    pub from: Address,
    pub to: Address,
}

pub fn emit_initialized(env: &Env, sponsor: Address, offer_token: Address) {
    let topics = (symbol_short!("init"), sponsor);
    env.events().publish(topics, offer_token);
}

pub fn emit_commitment_set(env: &Env, root: BytesN<32>, by: Address) {
    let topics = (symbol_short!("commit"),);
    env.events().publish(topics, CommitmentSet { root, by });
}

pub fn emit_fee_rate_set(env: &Env, fee_rate: u128) {
    let topics = (symbol_short!("fee_rate"),);
    env.events().publish(topics, FeeRateSet { fee_rate });
}

pub fn emit_initiated(env: &Env, initiated_at: u64, end_at: u64, total_offering: i128) {
    let topics = (symbol_short!("initiate"),);
    let data = SaleInitiated {
        initiated_at,
        end_at,
        total_offering,
    };
    env.events().publish(topics, data);
}

pub fn emit_allocated(env: &Env, allocation: &Allocation) {
    let topics = (symbol_short!("alloc"), allocation.participant.clone());
    env.events().publish(topics, allocation.clone());
}

pub fn emit_drawn(env: &Env, participant: Address, amount: i128) {
    let topics = (symbol_short!("drawn"), participant.clone());
    env.events().publish(topics, Drawn { participant, amount });
}

pub fn emit_refunded(env: &Env, participant: Address, amount: i128) {
    let topics = (symbol_short!("refund"), participant.clone());
    env.events().publish(topics, Drawn { participant, amount });
}

pub fn emit_settled(env: &Env, settlement: &Settlement) {
    let topics = (symbol_short!("settled"),);
    env.events().publish(topics, settlement.clone());
}

pub fn emit_vested_claimed(env: &Env, entry_id: u64, owner: Address, amount: i128, claimed: i128) {
    let topics = (symbol_short!("claimed"), entry_id);
    let data = VestedClaimed {
        entry_id,
        owner,
        amount,
        claimed,
    };
    env.events().publish(topics, data);
}

pub fn emit_entry_transferred(env: &Env, entry_id: u64, from: Address, to: Address) {
    let topics = (symbol_short!("transfer"), entry_id);
    let data = EntryTransferred { entry_id, from, to };
    env.events().publish(topics, data);
}
