//! # Types
//!
//! Shared data structures used across all modules of the sale contract.
//!
//! ## Config / State split
//!
//! A sale is stored as two separate instance entries:
//!
//! - [`SaleConfig`] is written at `init`; only the fee rate may change, and
//!   only until the sale is initiated.
//! - [`SaleState`] is written on initiation, every contribution and settlement.
//!
//! Per-participant and per-entry records live in persistent storage keyed by
//! address / entry id.
//!
//! ## Lifecycle
//!
//! ```text
//! Pending ──► Restricted ──► Open ──► Ended
//!     └───────────────────►┘    └──► Ended (offering exhausted)
//! ```
//!
//! Either stage may have zero duration, in which case it is skipped.

use soroban_sdk::{contracttype, Address};

use crate::curve::{StagedSale, Timing};

/// Decimal precision of the chain's native currency.
pub const NATIVE_DECIMALS: u32 = 7;

/// The asset participants pay with.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PaymentAsset {
    /// The chain's native currency, moved through its asset contract.
    Native(Address),
    /// Any fungible token with the given decimal precision.
    Token(Address, u32),
}

impl PaymentAsset {
    pub fn address(&self) -> Address {
        match self {
            PaymentAsset::Native(address) => address.clone(),
            PaymentAsset::Token(address, _) => address.clone(),
        }
    }

    pub fn decimals(&self) -> u32 {
        match self {
            PaymentAsset::Native(_) => NATIVE_DECIMALS,
            PaymentAsset::Token(_, decimals) => *decimals,
        }
    }
}

/// Configuration supplied once at `init`.
///
/// Prices are 18-decimal fixed point and express how many whole offer units
/// one whole payment unit buys. The fee rate is 18-decimal fixed point where
/// `10^18` is 100%.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleParams {
    pub offer_token: Address,
    pub offer_decimals: u32,
    pub payment: PaymentAsset,
    pub restricted_start_price: u128,
    pub restricted_end_price: u128,
    pub open_start_price: u128,
    pub open_end_price: u128,
    pub restricted_duration: u64,
    pub open_duration: u64,
    /// Offer-asset units put up for sale.
    pub total_offering: i128,
    /// Payment-asset units required for the sale to succeed.
    pub reserve_threshold: i128,
    /// Zero disables vesting; allocations are then drawn in one piece.
    pub vesting_period: u64,
    pub cliff_period: u64,
    pub fee_rate: u128,
}

/// Stored sale configuration: the supplied params plus derived values.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SaleConfig {
    pub offer_token: Address,
    pub offer_decimals: u32,
    pub payment: PaymentAsset,
    pub restricted_start_price: u128,
    pub restricted_end_price: u128,
    pub open_start_price: u128,
    pub open_end_price: u128,
    pub restricted_duration: u64,
    pub open_duration: u64,
    pub total_offering: i128,
    pub reserve_threshold: i128,
    pub vesting_period: u64,
    pub cliff_period: u64,
    pub fee_rate: u128,
    /// `10^(payment_decimals / 2)` in the payment asset's smallest unit.
    pub min_contribution: i128,
}

impl SaleConfig {
    pub fn from_params(params: SaleParams, min_contribution: i128) -> Self {
        SaleConfig {
            offer_token: params.offer_token,
            offer_decimals: params.offer_decimals,
            payment: params.payment,
            restricted_start_price: params.restricted_start_price,
            restricted_end_price: params.restricted_end_price,
            open_start_price: params.open_start_price,
            open_end_price: params.open_end_price,
            restricted_duration: params.restricted_duration,
            open_duration: params.open_duration,
            total_offering: params.total_offering,
            reserve_threshold: params.reserve_threshold,
            vesting_period: params.vesting_period,
            cliff_period: params.cliff_period,
            fee_rate: params.fee_rate,
            min_contribution,
        }
    }

    pub fn payment_decimals(&self) -> u32 {
        self.payment.decimals()
    }

    pub fn vesting_enabled(&self) -> bool {
        self.vesting_period > 0
    }
}

impl StagedSale for SaleConfig {
    fn restricted_duration(&self) -> u64 {
        self.restricted_duration
    }

    fn open_duration(&self) -> u64 {
        self.open_duration
    }

    fn restricted_prices(&self) -> (u128, u128) {
        (self.restricted_start_price, self.restricted_end_price)
    }

    fn open_prices(&self) -> (u128, u128) {
        (self.open_start_price, self.open_end_price)
    }
}

/// Mutable aggregate state of the sale.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SaleState {
    pub initiated: bool,
    pub initiated_at: u64,
    /// Scheduled end; moved to the current time when the offering sells out.
    pub end_at: u64,
    /// Offer-asset units allocated so far.
    pub sold: i128,
    /// Payment-asset units retained so far (after oversubscription refunds).
    pub acquired: i128,
    pub accrued_fee: i128,
    pub sponsor_settled: bool,
}

impl SaleState {
    /// Start and end of the sale window, once initiated.
    pub fn timing(&self) -> Option<Timing> {
        if self.initiated {
            Some(Timing {
                initiated_at: self.initiated_at,
                end_at: self.end_at,
            })
        } else {
            None
        }
    }

    pub fn reserve_met(&self, config: &SaleConfig) -> bool {
        self.acquired >= config.reserve_threshold
    }
}

/// Per-participant ledger record.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Participant {
    /// Cumulative payment retained from this participant.
    pub contributed: i128,
    /// Offer-asset units awaiting a one-off draw. Only used without vesting.
    pub allocated: i128,
    /// Most recent vesting entry minted for this participant.
    pub vesting_entry: Option<u64>,
}

/// A transferable claim on a fixed amount of linearly vesting offer asset.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingEntry {
    pub id: u64,
    pub owner: Address,
    pub total: i128,
    pub claimed: i128,
}

impl VestingEntry {
    pub fn fully_claimed(&self) -> bool {
        self.claimed == self.total
    }
}

/// Where the sale currently stands in time.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SaleStage {
    /// Not initiated yet.
    Pending,
    /// Capped, proof-gated stage.
    Restricted,
    /// Anyone may contribute.
    Open,
    /// Window elapsed or offering sold out.
    Ended,
}

/// Outcome of one contribution, also published as the allocation event.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Allocation {
    pub participant: Address,
    /// Payment retained after any oversubscription refund.
    pub contributed: i128,
    /// Offer-asset units allocated.
    pub allocated: i128,
    /// Payment sent back because the offering ran out.
    pub refunded: i128,
    /// Protocol fee accrued on `contributed`.
    pub fee: i128,
    pub vesting_entry: Option<u64>,
}

/// What the sponsor-side settlement moved.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub reserve_met: bool,
    /// Payment asset sent to the sponsor.
    pub proceeds: i128,
    /// Payment asset sent to the protocol.
    pub fee: i128,
    /// Offer asset returned to the sponsor.
    pub offer_returned: i128,
}
