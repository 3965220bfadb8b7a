extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger},
    token, Address, BytesN, Env, Vec,
};

use crate::auth::{hash_pair, leaf_hash};
use crate::{PaymentAsset, SaleParams, TokenSale, TokenSaleClient};

pub const START: u64 = 1_000_000;
pub const DAY: u64 = 86_400;

/// One whole payment unit (18 decimals).
pub const PAY: i128 = 1_000_000_000_000_000_000;
/// One whole offer unit (10 decimals).
pub const OFFER: i128 = 10_000_000_000;
/// Price of 10 offer units per payment unit.
pub const PRICE_10: u128 = 10_000_000_000_000_000_000;
/// 5% protocol fee.
pub const FEE_5_PCT: u128 = 50_000_000_000_000_000;

pub struct Sale {
    pub env: Env,
    pub client: TokenSaleClient<'static>,
    pub sponsor: Address,
    pub protocol: Address,
    pub offer: token::Client<'static>,
    pub payment: token::Client<'static>,
    payment_admin: token::StellarAssetClient<'static>,
}

fn create_token(env: &Env) -> (token::Client<'static>, token::StellarAssetClient<'static>) {
    let admin = Address::generate(env);
    let addr = env.register_stellar_asset_contract_v2(admin).address();
    (
        token::Client::new(env, &addr),
        token::StellarAssetClient::new(env, &addr),
    )
}

/// Defaults: 1 day restricted + 2 days open at a flat 10 offer per payment,
/// 1000 offer units for sale, reserve 50 payment units, 5% fee, no vesting.
pub fn default_params(offer: &Address, payment: &Address) -> SaleParams {
    SaleParams {
        offer_token: offer.clone(),
        offer_decimals: 10,
        payment: PaymentAsset::Token(payment.clone(), 18),
        restricted_start_price: PRICE_10,
        restricted_end_price: PRICE_10,
        open_start_price: PRICE_10,
        open_end_price: PRICE_10,
        restricted_duration: DAY,
        open_duration: 2 * DAY,
        total_offering: 1_000 * OFFER,
        reserve_threshold: 50 * PAY,
        vesting_period: 0,
        cliff_period: 0,
        fee_rate: FEE_5_PCT,
    }
}

impl Sale {
    /// Deploy and `init` a sale, letting `tweak` adjust the default params.
    pub fn new(tweak: impl FnOnce(&mut SaleParams)) -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.ledger().set_timestamp(START);

        let contract_id = env.register(TokenSale, ());
        let client = TokenSaleClient::new(&env, &contract_id);

        let (offer, offer_admin) = create_token(&env);
        let (payment, payment_admin) = create_token(&env);

        let sponsor = Address::generate(&env);
        let protocol = Address::generate(&env);

        let mut params = default_params(&offer.address, &payment.address);
        tweak(&mut params);
        offer_admin.mint(&sponsor, &params.total_offering);

        client.init(&sponsor, &protocol, &params);

        Sale {
            env,
            client,
            sponsor,
            protocol,
            offer,
            payment,
            payment_admin,
        }
    }

    pub fn initiate(&self) {
        self.client.initiate(&self.sponsor);
    }

    /// Move the ledger clock to `offset` seconds after `START`.
    pub fn at(&self, offset: u64) {
        self.env.ledger().set_timestamp(START + offset);
    }

    /// A fresh participant holding `balance` payment units.
    pub fn funded_participant(&self, balance: i128) -> Address {
        let participant = Address::generate(&self.env);
        self.payment_admin.mint(&participant, &balance);
        participant
    }

    pub fn end_at(&self) -> u64 {
        self.client.get_state().end_at
    }

    /// Move the ledger clock to `offset` seconds after the sale end.
    pub fn after_end(&self, offset: u64) {
        let end = self.end_at();
        self.env.ledger().set_timestamp(end + offset);
    }
}

/// Build a two-level tree over `members` (padded with the first leaf) and
/// return the root plus each member's proof.
pub fn build_tree(env: &Env, members: &[(Address, i128)]) -> (BytesN<32>, std::vec::Vec<Vec<BytesN<32>>>) {
    let mut leaves: std::vec::Vec<BytesN<32>> = members
        .iter()
        .map(|(address, cap)| leaf_hash(env, address, *cap))
        .collect();
    while leaves.len() < 4 {
        leaves.push(leaves[0].clone());
    }
    assert!(leaves.len() == 4, "helper supports up to four members");

    let left = hash_pair(env, &leaves[0], &leaves[1]);
    let right = hash_pair(env, &leaves[2], &leaves[3]);
    let root = hash_pair(env, &left, &right);

    let proofs = (0..members.len())
        .map(|i| {
            let sibling = leaves[i ^ 1].clone();
            let uncle = if i < 2 { right.clone() } else { left.clone() };
            Vec::from_array(env, [sibling, uncle])
        })
        .collect();
    (root, proofs)
}
