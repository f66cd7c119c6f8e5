//! # SmartFunding Contract
//!
//! A crowdfunding ledger. Investors put native currency into a shared pool
//! and earn a proportional claim on a fixed budget of reward tokens. Each
//! investor may later either **claim** the reward or **refund** the
//! investment, never both.
//!
//! | Phase      | Entry Point(s)                                  |
//! |------------|-------------------------------------------------|
//! | Deployment | `__constructor(owner, token, currency)`         |
//! | Setup      | [`SmartFunding::initialize`]                    |
//! | Funding    | [`SmartFunding::invest`]                        |
//! | Settlement | [`SmartFunding::claim`], [`SmartFunding::refund`] |
//! | Queries    | `reward_of`, `invest_of`, `claimed_of`, `pool`, `goal`, `summary`, ... |
//!
//! ## Reward
//!
//! ```text
//! reward_of(a) = invested(a) * reward_budget / goal     (floor, while unclaimed)
//!              = 0                                      (once claimed)
//! ```
//!
//! `reward_budget` is the reward-token balance the contract holds when
//! `initialize` runs, so the owner funds the contract first.
//!
//! ## Settlement ordering
//!
//! `claim` and `refund` commit every storage write before the outgoing
//! token transfer. A failing transfer reverts the whole invocation.
//!
//! Storage access is delegated to [`storage`]; event shapes live in
//! [`events`].

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env};

pub mod events;
mod reward;
mod storage;
mod types;

#[cfg(test)]
extern crate std;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use reward::compute_reward;
pub use types::{Config, FundingSummary, Investor, Settings};

const SECONDS_PER_DAY: u64 = 86_400;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// `initialize` was already called.
    AlreadyInitialized = 1,
    /// Amount should be more than 0.
    ZeroAmount         = 2,
    /// Computed reward is zero.
    NoReward           = 3,
    /// Reward already claimed.
    AlreadyClaimed     = 4,
    /// Nothing invested.
    NoInvestment       = 5,
    /// `initialize` has not been called yet.
    NotInitialized     = 6,
    /// Goal must be more than 0.
    InvalidGoal        = 7,
    /// Checked arithmetic overflowed.
    Overflow           = 8,
}

#[contract]
pub struct SmartFunding;

#[contractimpl]
impl SmartFunding {
    // ─────────────────────────────────────────────────────────
    // Deployment and setup
    // ─────────────────────────────────────────────────────────

    /// Record the owner, the reward token and the currency token.
    pub fn __constructor(env: Env, owner: Address, token: Address, currency: Address) {
        storage::save_settings(
            &env,
            &Settings {
                owner,
                token,
                currency,
            },
        );
    }

    /// Configure the funding goal and window. Callable once, by the owner.
    ///
    /// The reward budget is the reward-token balance the contract holds at
    /// this moment.
    pub fn initialize(env: Env, goal: i128, duration_days: u32) -> Result<(), Error> {
        let settings = storage::load_settings(&env);
        settings.owner.require_auth();

        if storage::has_config(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if goal <= 0 {
            return Err(Error::InvalidGoal);
        }

        let reward_budget =
            token::Client::new(&env, &settings.token).balance(&env.current_contract_address());

        let started_at = env.ledger().timestamp();
        let deadline =
            started_at.saturating_add(u64::from(duration_days) * SECONDS_PER_DAY);

        storage::save_config(
            &env,
            &Config {
                goal,
                reward_budget,
                duration_days,
                started_at,
                deadline,
            },
        );

        events::emit_initialized(&env, goal, reward_budget, duration_days, deadline);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Funding and settlement
    // ─────────────────────────────────────────────────────────

    /// Move `amount` of currency from `investor` into the pool.
    ///
    /// Repeatable and cumulative. The goal is not a cap. Closed to an
    /// investor who has claimed, since that deposit could never be
    /// claimed or refunded.
    pub fn invest(env: Env, investor: Address, amount: i128) -> Result<(), Error> {
        investor.require_auth();

        if !storage::has_config(&env) {
            return Err(Error::NotInitialized);
        }
        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }

        let mut entry = storage::load_investor(&env, &investor);
        if entry.claimed {
            return Err(Error::AlreadyClaimed);
        }

        let settings = storage::load_settings(&env);
        entry.invested = entry.invested.checked_add(amount).ok_or(Error::Overflow)?;
        let pool = storage::get_pool(&env)
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        storage::save_investor(&env, &investor, &entry);
        storage::set_pool(&env, pool);

        token::Client::new(&env, &settings.currency).transfer(
            &investor,
            &env.current_contract_address(),
            &amount,
        );

        events::emit_invested(&env, investor, amount);
        Ok(())
    }

    /// Pay out the investor's reward. Returns the amount paid.
    ///
    /// The investment record is kept; `pool` is unchanged.
    pub fn claim(env: Env, investor: Address) -> Result<i128, Error> {
        investor.require_auth();

        let config = storage::load_config(&env).ok_or(Error::NotInitialized)?;
        let mut entry = storage::load_investor(&env, &investor);

        if entry.claimed {
            return Err(Error::AlreadyClaimed);
        }
        let reward = compute_reward(entry.invested, config.reward_budget, config.goal)
            .ok_or(Error::Overflow)?;
        if reward <= 0 {
            return Err(Error::NoReward);
        }

        entry.claimed = true;
        storage::save_investor(&env, &investor, &entry);

        let settings = storage::load_settings(&env);
        token::Client::new(&env, &settings.token).transfer(
            &env.current_contract_address(),
            &investor,
            &reward,
        );

        events::emit_reward_claimed(&env, investor, reward);
        Ok(reward)
    }

    /// Return the investor's whole investment. Returns the amount paid.
    ///
    /// Rejected once the investor has claimed.
    pub fn refund(env: Env, investor: Address) -> Result<i128, Error> {
        investor.require_auth();

        let mut entry = storage::load_investor(&env, &investor);
        if entry.invested <= 0 {
            return Err(Error::NoInvestment);
        }
        if entry.claimed {
            return Err(Error::AlreadyClaimed);
        }

        let amount = entry.invested;
        let pool = storage::get_pool(&env)
            .checked_sub(amount)
            .ok_or(Error::Overflow)?;

        entry.invested = 0;
        storage::save_investor(&env, &investor, &entry);
        storage::set_pool(&env, pool);

        let settings = storage::load_settings(&env);
        token::Client::new(&env, &settings.currency).transfer(
            &env.current_contract_address(),
            &investor,
            &amount,
        );

        events::emit_refunded(&env, investor, amount);
        Ok(amount)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    /// Reward currently claimable by `investor`; `0` once claimed.
    pub fn reward_of(env: Env, investor: Address) -> i128 {
        let Some(config) = storage::load_config(&env) else {
            return 0;
        };
        let entry = storage::load_investor(&env, &investor);
        if entry.claimed {
            return 0;
        }
        compute_reward(entry.invested, config.reward_budget, config.goal).unwrap_or(0)
    }

    pub fn invest_of(env: Env, investor: Address) -> i128 {
        storage::load_investor(&env, &investor).invested
    }

    pub fn claimed_of(env: Env, investor: Address) -> bool {
        storage::load_investor(&env, &investor).claimed
    }

    pub fn pool(env: Env) -> i128 {
        storage::get_pool(&env)
    }

    /// Funding goal, or `0` before initialization.
    pub fn goal(env: Env) -> i128 {
        storage::load_config(&env).map_or(0, |c| c.goal)
    }

    pub fn reward_budget(env: Env) -> i128 {
        storage::load_config(&env).map_or(0, |c| c.reward_budget)
    }

    pub fn duration_days(env: Env) -> u32 {
        storage::load_config(&env).map_or(0, |c| c.duration_days)
    }

    /// End of the funding window as a ledger timestamp. Not enforced.
    pub fn deadline(env: Env) -> u64 {
        storage::load_config(&env).map_or(0, |c| c.deadline)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::has_config(&env)
    }

    pub fn token_address(env: Env) -> Address {
        storage::load_settings(&env).token
    }

    pub fn currency_address(env: Env) -> Address {
        storage::load_settings(&env).currency
    }

    pub fn owner(env: Env) -> Address {
        storage::load_settings(&env).owner
    }

    pub fn summary(env: Env) -> FundingSummary {
        let pool = storage::get_pool(&env);
        match storage::load_config(&env) {
            Some(config) => FundingSummary {
                initialized: true,
                goal: config.goal,
                reward_budget: config.reward_budget,
                pool,
                duration_days: config.duration_days,
                deadline: config.deadline,
            },
            None => FundingSummary {
                initialized: false,
                goal: 0,
                reward_budget: 0,
                pool,
                duration_days: 0,
                deadline: 0,
            },
        }
    }
}
