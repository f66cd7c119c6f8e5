extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, TryIntoVal,
};

use crate::events::{Initialized, Invested, Refunded, RewardClaimed};
use crate::{SmartFunding, SmartFundingClient};

const UNIT: i128 = 10_000_000;
const SUPPLY: i128 = 1_000_000 * UNIT;

fn setup() -> (
    Env,
    SmartFundingClient<'static>,
    Address,
    token::Client<'static>,
    token::StellarAssetClient<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();

    let owner = Address::generate(&env);
    let token_sac = env.register_stellar_asset_contract_v2(owner.clone());
    let token = token::Client::new(&env, &token_sac.address());
    token::StellarAssetClient::new(&env, &token_sac.address()).mint(&owner, &SUPPLY);

    let issuer = Address::generate(&env);
    let currency_sac = env.register_stellar_asset_contract_v2(issuer);
    let currency_admin = token::StellarAssetClient::new(&env, &currency_sac.address());

    let contract_id = env.register(
        SmartFunding,
        (owner.clone(), token.address.clone(), currency_sac.address()),
    );
    let client = SmartFundingClient::new(&env, &contract_id);

    token.transfer(&owner, &client.address, &SUPPLY);
    (env, client, owner, token, currency_admin)
}

#[test]
fn test_initialized_event() {
    let (env, client, _owner, _token, _currency) = setup();

    client.initialize(&UNIT, &7);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("init").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Initialized = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Initialized {
            goal: UNIT,
            reward_budget: SUPPLY,
            duration_days: 7,
            deadline: client.deadline(),
        }
    );
}

#[test]
fn test_invest_event() {
    let (env, client, _owner, _token, currency) = setup();
    client.initialize(&UNIT, &7);
    let investor = Address::generate(&env);
    currency.mint(&investor, &UNIT);

    client.invest(&investor, &(UNIT / 10));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("invest"), investor)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("invest").into_val(&env),
        investor.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Invested = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Invested {
            investor: investor.clone(),
            amount: UNIT / 10,
        }
    );
}

#[test]
fn test_claim_event() {
    let (env, client, _owner, _token, currency) = setup();
    client.initialize(&UNIT, &7);
    let investor = Address::generate(&env);
    currency.mint(&investor, &UNIT);
    client.invest(&investor, &(9 * UNIT / 10));

    client.claim(&investor);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("claim"), investor)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("claim").into_val(&env),
        investor.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RewardClaimed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        RewardClaimed {
            investor: investor.clone(),
            amount: 900_000 * UNIT,
        }
    );
}

#[test]
fn test_claim_transfers_reward_token() {
    let (env, client, _owner, token, currency) = setup();
    client.initialize(&UNIT, &7);
    let investor = Address::generate(&env);
    currency.mint(&investor, &UNIT);
    client.invest(&investor, &(UNIT / 10));

    client.claim(&investor);

    // The reward token publishes its own transfer record just before ours.
    let all_events = env.events().all();
    let transfer_event = all_events
        .get(all_events.len() - 2)
        .expect("No transfer event found");
    assert_eq!(transfer_event.0, token.address);
}

#[test]
fn test_refund_event() {
    let (env, client, _owner, _token, currency) = setup();
    client.initialize(&UNIT, &7);
    let investor = Address::generate(&env);
    currency.mint(&investor, &UNIT);
    client.invest(&investor, &(UNIT / 2));

    client.refund(&investor);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("refund"), investor)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("refund").into_val(&env),
        investor.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Refunded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Refunded {
            investor: investor.clone(),
            amount: UNIT / 2,
        }
    );
}
