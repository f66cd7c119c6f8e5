//! # Events
//!
//! Every state-changing entry point publishes exactly one event after its
//! storage writes and token transfers have succeeded.
//!
//! | Topic                  | Data              |
//! |------------------------|-------------------|
//! | `("init",)`            | [`Initialized`]   |
//! | `("invest", investor)` | [`Invested`]      |
//! | `("claim", investor)`  | [`RewardClaimed`] |
//! | `("refund", investor)` | [`Refunded`]      |
//!
//! The off-chain indexer keys on the leading topic symbol, so these names
//! are part of the public interface.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Initialized {
    pub goal: i128,
    pub reward_budget: i128,
    pub duration_days: u32,
    pub deadline: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invested {
    pub investor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimed {
    pub investor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Refunded {
    pub investor: Address,
    pub amount: i128,
}

pub fn emit_initialized(
    env: &Env,
    goal: i128,
    reward_budget: i128,
    duration_days: u32,
    deadline: u64,
) {
    env.events().publish(
        (symbol_short!("init"),),
        Initialized {
            goal,
            reward_budget,
            duration_days,
            deadline,
        },
    );
}

pub fn emit_invested(env: &Env, investor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("invest"), investor.clone()),
        Invested { investor, amount },
    );
}

pub fn emit_reward_claimed(env: &Env, investor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("claim"), investor.clone()),
        RewardClaimed { investor, amount },
    );
}

pub fn emit_refunded(env: &Env, investor: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("refund"), investor.clone()),
        Refunded { investor, amount },
    );
}
