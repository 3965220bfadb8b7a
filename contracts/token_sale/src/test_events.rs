extern crate std;

use soroban_sdk::{
    symbol_short, testutils::Events, vec, IntoVal, TryIntoVal, Val, Vec,
};

use crate::events::{Drawn, FeeRateSet, SaleInitiated, VestedClaimed};
use crate::test_support::*;
use crate::{Allocation, Settlement};

/// Topics and data of the most recent event published by the sale contract.
fn last_event(s: &Sale) -> (Vec<Val>, Val) {
    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");
    assert_eq!(last_event.0, s.client.address);
    (last_event.1, last_event.2)
}

#[test]
fn test_fee_rate_event() {
    let s = Sale::new(|_| {});
    s.client.set_fee_rate(&s.protocol, &0);

    let (topics, data) = last_event(&s);
    assert_eq!(topics, vec![&s.env, symbol_short!("fee_rate").into_val(&s.env)]);
    let event_data: FeeRateSet = data.try_into_val(&s.env).unwrap();
    assert_eq!(event_data, FeeRateSet { fee_rate: 0 });
}

#[test]
fn test_initiated_event() {
    let s = Sale::new(|_| {});
    s.initiate();

    // Topic: (symbol_short!("initiate"),)
    let (topics, data) = last_event(&s);
    assert_eq!(topics, vec![&s.env, symbol_short!("initiate").into_val(&s.env)]);

    let event_data: SaleInitiated = data.try_into_val(&s.env).unwrap();
    assert_eq!(event_data, SaleInitiated {
        initiated_at: START,
        end_at: START + 3 * DAY,
        total_offering: 1_000 * OFFER,
    });
}

#[test]
fn test_allocation_event() {
    let s = Sale::new(|_| {});
    s.initiate();
    s.at(DAY);
    let alice = s.funded_participant(200 * PAY);
    s.client.contribute(&alice, &(150 * PAY));

    // Topic: (symbol_short!("alloc"), participant)
    let (topics, data) = last_event(&s);
    let expected_topics = vec![
        &s.env,
        symbol_short!("alloc").into_val(&s.env),
        alice.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: Allocation = data.try_into_val(&s.env).unwrap();
    assert_eq!(event_data, Allocation {
        participant: alice.clone(),
        contributed: 100 * PAY,
        allocated: 1_000 * OFFER,
        refunded: 50 * PAY,
        fee: 5 * PAY,
        vesting_entry: None,
    });
}

#[test]
fn test_drawn_and_refund_events() {
    let s = Sale::new(|_| {});
    s.initiate();
    s.at(DAY);
    let alice = s.funded_participant(60 * PAY);
    s.client.contribute(&alice, &(60 * PAY));
    s.after_end(1);
    s.client.draw_after_success(&alice);

    let (topics, data) = last_event(&s);
    let expected_topics = vec![
        &s.env,
        symbol_short!("drawn").into_val(&s.env),
        alice.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);
    let event_data: Drawn = data.try_into_val(&s.env).unwrap();
    assert_eq!(event_data, Drawn { participant: alice.clone(), amount: 600 * OFFER });

    let failed = Sale::new(|_| {});
    failed.initiate();
    failed.at(DAY);
    let bob = failed.funded_participant(PAY);
    failed.client.contribute(&bob, &PAY);
    failed.after_end(1);
    failed.client.draw_after_failure(&bob);

    let (topics, data) = last_event(&failed);
    let expected_topics = vec![
        &failed.env,
        symbol_short!("refund").into_val(&failed.env),
        bob.into_val(&failed.env),
    ];
    assert_eq!(topics, expected_topics);
    let event_data: Drawn = data.try_into_val(&failed.env).unwrap();
    assert_eq!(event_data, Drawn { participant: bob.clone(), amount: PAY });
}

#[test]
fn test_settled_event() {
    let s = Sale::new(|_| {});
    s.initiate();
    s.at(DAY);
    let alice = s.funded_participant(60 * PAY);
    s.client.contribute(&alice, &(60 * PAY));
    s.after_end(1);
    let settlement = s.client.settle(&s.sponsor);

    let (topics, data) = last_event(&s);
    assert_eq!(topics, vec![&s.env, symbol_short!("settled").into_val(&s.env)]);
    let event_data: Settlement = data.try_into_val(&s.env).unwrap();
    assert_eq!(event_data, settlement);
}

#[test]
fn test_vested_claimed_event() {
    let s = Sale::new(|p| p.vesting_period = 3 * DAY);
    s.initiate();
    s.at(DAY);
    let alice = s.funded_participant(60 * PAY);
    s.client.contribute(&alice, &(60 * PAY));
    s.after_end(3 * DAY);
    s.client.claim_vested(&alice, &vec![&s.env, 0u64]);

    // Topic: (symbol_short!("claimed"), entry_id)
    let (topics, data) = last_event(&s);
    let expected_topics = vec![
        &s.env,
        symbol_short!("claimed").into_val(&s.env),
        0u64.into_val(&s.env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: VestedClaimed = data.try_into_val(&s.env).unwrap();
    assert_eq!(event_data, VestedClaimed {
        entry_id: 0,
        owner: alice.clone(),
        amount: 600 * OFFER,
        claimed: 600 * OFFER,
    });
}
