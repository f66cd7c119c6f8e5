//! Ledger invariants shared by the scenario and fuzz tests.
//!
//! Each helper reads contract state through the public client only, so a
//! failure points at observable behaviour rather than storage layout.

use soroban_sdk::{token, Address};

use crate::{compute_reward, SmartFundingClient};

/// The pool equals the sum of every investor's current investment.
pub fn assert_pool_matches_ledger(client: &SmartFundingClient, investors: &[Address]) {
    let total: i128 = investors.iter().map(|a| client.invest_of(a)).sum();
    let pool = client.pool();
    assert_eq!(
        pool, total,
        "pool {} does not match sum of investments {}",
        pool, total
    );
}

/// Investments and pool never go negative.
pub fn assert_non_negative(client: &SmartFundingClient, investors: &[Address]) {
    assert!(client.pool() >= 0, "pool is negative: {}", client.pool());
    for investor in investors {
        let invested = client.invest_of(investor);
        assert!(invested >= 0, "investment is negative: {}", invested);
    }
}

/// `reward_of` follows the floor formula while unclaimed and is zero after.
pub fn assert_reward_formula(client: &SmartFundingClient, investor: &Address) {
    let reward = client.reward_of(investor);
    if client.claimed_of(investor) {
        assert_eq!(reward, 0, "claimed investor still shows reward {}", reward);
        return;
    }
    let expected = compute_reward(
        client.invest_of(investor),
        client.reward_budget(),
        client.goal(),
    )
    .unwrap_or(0);
    assert_eq!(
        reward, expected,
        "reward {} does not follow invested * budget / goal = {}",
        reward, expected
    );
    if client.invest_of(investor) == 0 {
        assert_eq!(reward, 0, "reward {} without any investment", reward);
    }
}

/// The contract holds exactly the pooled currency.
pub fn assert_pool_backed(client: &SmartFundingClient, currency: &token::Client) {
    let held = currency.balance(&client.address);
    assert_eq!(
        held,
        client.pool(),
        "contract holds {} currency but pool is {}",
        held,
        client.pool()
    );
}

/// A successful invest or refund moves the pool by exactly its amount.
pub fn assert_pool_delta(pool_before: i128, pool_after: i128, delta: i128) {
    assert_eq!(
        pool_after,
        pool_before + delta,
        "pool changed by {} instead of {}",
        pool_after - pool_before,
        delta
    );
}

/// Run every per-state invariant over `investors`.
pub fn assert_all_ledger_invariants(
    client: &SmartFundingClient,
    currency: &token::Client,
    investors: &[Address],
) {
    assert_non_negative(client, investors);
    assert_pool_matches_ledger(client, investors);
    assert_pool_backed(client, currency);
    for investor in investors {
        assert_reward_formula(client, investor);
    }
}
