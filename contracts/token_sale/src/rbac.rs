//! # RBAC: sale roles
//!
//! Three roles, each held by exactly one address:
//!
//! ```text
//! Sponsor   ── offers the asset, initiates, receives proceeds
//!   └── Manager  ── appointed by the sponsor; sets the commitment, settles
//! Protocol  ── fee recipient; tunes the fee rate before initiation
//! ```
//!
//! ## Storage layout
//!
//! - `RbacKey::Sponsor`  → `Address`
//! - `RbacKey::Manager`  → `Address` (absent until appointed)
//! - `RbacKey::Protocol` → `Address`
//!
//! ## Event emissions
//!
//! | Event topic prefix | Trigger                         |
//! |--------------------|---------------------------------|
//! | `role_set`         | Role assigned at init or replaced |
//!
//! The same address may hold several roles; [`role_of`] reports the most
//! privileged one.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

use crate::Error;

/// Roles recognised by the sale.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// Owner of the offering and recipient of proceeds.
    Sponsor,
    /// Operator acting for the sponsor.
    Manager,
    /// Fee recipient.
    Protocol,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RbacKey {
    Sponsor,
    Manager,
    Protocol,
}

fn key_for(role: &Role) -> RbacKey {
    match role {
        Role::Sponsor => RbacKey::Sponsor,
        Role::Manager => RbacKey::Manager,
        Role::Protocol => RbacKey::Protocol,
    }
}

/// Address currently holding `role`, if any.
pub fn holder(env: &Env, role: &Role) -> Option<Address> {
    env.storage().instance().get(&key_for(role))
}

fn store(env: &Env, role: &Role, address: &Address) {
    env.storage().instance().set(&key_for(role), address);
}

// ─────────────────────────────────────────────────────────
// Initialisation
// ─────────────────────────────────────────────────────────

/// Record the sponsor and protocol. Panics with `Error::AlreadyInitialized`
/// on a second call.
pub fn init_roles(env: &Env, sponsor: &Address, protocol: &Address) {
    if env.storage().instance().has(&RbacKey::Sponsor) {
        panic_with_error_rbac(env, Error::AlreadyInitialized);
    }
    store(env, &Role::Sponsor, sponsor);
    store(env, &Role::Protocol, protocol);
    emit(env, sponsor, &Role::Sponsor, None);
    emit(env, protocol, &Role::Protocol, None);
}

/// Appoint `manager`, replacing any previous one. Sponsor only.
pub fn set_manager(env: &Env, caller: &Address, manager: &Address) {
    require_role(env, caller, &Role::Sponsor);
    store(env, &Role::Manager, manager);
    emit(env, manager, &Role::Manager, Some(caller.clone()));
}

/// The sponsor address. Panics with `Error::NotInitialized` before init.
pub fn sponsor(env: &Env) -> Address {
    holder(env, &Role::Sponsor)
        .unwrap_or_else(|| panic_with_error_rbac(env, Error::NotInitialized))
}

/// The fee recipient. Panics with `Error::NotInitialized` before init.
pub fn protocol(env: &Env) -> Address {
    holder(env, &Role::Protocol)
        .unwrap_or_else(|| panic_with_error_rbac(env, Error::NotInitialized))
}

// ─────────────────────────────────────────────────────────
// Access guards
// ─────────────────────────────────────────────────────────

/// Assert that `address` holds `role`.
/// Panics with `Error::NotAuthorized` on failure.
pub fn require_role(env: &Env, address: &Address, role: &Role) {
    if !has_role(env, address.clone(), role.clone()) {
        panic_with_error_rbac(env, Error::NotAuthorized);
    }
}

/// Assert that `address` is the sponsor or the manager.
pub fn require_sponsor_or_manager(env: &Env, address: &Address) {
    if has_role(env, address.clone(), Role::Sponsor) || has_role(env, address.clone(), Role::Manager)
    {
        return;
    }
    panic_with_error_rbac(env, Error::NotAuthorized);
}

// ─────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────

/// The most privileged role held by `address`, or `None`.
pub fn role_of(env: &Env, address: Address) -> Option<Role> {
    [Role::Sponsor, Role::Manager, Role::Protocol]
        .into_iter()
        .find(|role| holder(env, role).as_ref() == Some(&address))
}

pub fn has_role(env: &Env, address: Address, role: Role) -> bool {
    holder(env, &role).map(|a| a == address).unwrap_or(false)
}

// ─────────────────────────────────────────────────────────
// Internal helpers
// ─────────────────────────────────────────────────────────

/// Topic: `(role_set, target_address, role_symbol)`; data: `Option<caller>`.
fn emit(env: &Env, target: &Address, role: &Role, by: Option<Address>) {
    let role_sym = match role {
        Role::Sponsor => symbol_short!("sponsor"),
        Role::Manager => symbol_short!("manager"),
        Role::Protocol => symbol_short!("protocol"),
    };
    env.events()
        .publish((symbol_short!("role_set"), target.clone(), role_sym), by);
}

#[inline(always)]
fn panic_with_error_rbac(env: &Env, err: Error) -> ! {
    soroban_sdk::panic_with_error!(env, err)
}
