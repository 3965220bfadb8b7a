//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key          | Type          | Description                                  |
//! |--------------|---------------|----------------------------------------------|
//! | `Config`     | `SaleConfig`  | Sale configuration                           |
//! | `State`      | `SaleState`   | Aggregate sale state                         |
//! | `Commitment` | `BytesN<32>`  | Authorization root for the restricted stage  |
//! | `EntryCount` | `u64`         | Auto-increment vesting entry id counter      |
//! | `Lock`       | `bool`        | Held while a mutating entry point runs       |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                  | Type           | Description               |
//! |----------------------|----------------|---------------------------|
//! | `Participant(addr)`  | `Participant`  | Per-participant record    |
//! | `Entry(id)`          | `VestingEntry` | Vesting entry             |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.

use soroban_sdk::{contracttype, Address, BytesN, Env};

use crate::types::{Participant, SaleConfig, SaleState, VestingEntry};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    State,
    Commitment,
    EntryCount,
    Lock,
    Participant(Address),
    Entry(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &SaleConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<SaleConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

/// Sale state; all-zero until the first write.
pub fn load_state(env: &Env) -> SaleState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .unwrap_or_default()
}

pub fn save_state(env: &Env, state: &SaleState) {
    env.storage().instance().set(&DataKey::State, state);
}

pub fn get_commitment(env: &Env) -> Option<BytesN<32>> {
    env.storage().instance().get(&DataKey::Commitment)
}

pub fn set_commitment(env: &Env, root: &BytesN<32>) {
    env.storage().instance().set(&DataKey::Commitment, root);
}

/// Read and increment the vesting entry counter.
pub fn next_entry_id(env: &Env) -> u64 {
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::EntryCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::EntryCount, &(current + 1));
    current
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Participant record; an empty record for unknown addresses.
pub fn load_participant(env: &Env, participant: &Address) -> Participant {
    let key = DataKey::Participant(participant.clone());
    match env.storage().persistent().get(&key) {
        Some(record) => {
            bump_persistent(env, &key);
            record
        }
        None => Participant::default(),
    }
}

pub fn save_participant(env: &Env, participant: &Address, record: &Participant) {
    let key = DataKey::Participant(participant.clone());
    env.storage().persistent().set(&key, record);
    bump_persistent(env, &key);
}

pub fn load_entry(env: &Env, id: u64) -> Result<VestingEntry, Error> {
    let key = DataKey::Entry(id);
    let entry: VestingEntry = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::EntryNotFound)?;
    bump_persistent(env, &key);
    Ok(entry)
}

pub fn save_entry(env: &Env, entry: &VestingEntry) {
    let key = DataKey::Entry(entry.id);
    env.storage().persistent().set(&key, entry);
    bump_persistent(env, &key);
}

// ── Re-entrancy lock ─────────────────────────────────────────────────

/// Per-instance mutual exclusion around state-mutating entry points.
///
/// Released on drop.
pub struct SaleLock<'a> {
    env: &'a Env,
}

impl<'a> SaleLock<'a> {
    pub fn acquire(env: &'a Env) -> Result<Self, Error> {
        if env.storage().instance().has(&DataKey::Lock) {
            return Err(Error::Reentrant);
        }
        env.storage().instance().set(&DataKey::Lock, &true);
        Ok(SaleLock { env })
    }
}

impl Drop for SaleLock<'_> {
    fn drop(&mut self) {
        self.env.storage().instance().remove(&DataKey::Lock);
    }
}
