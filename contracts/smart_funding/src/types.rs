//! # Types
//!
//! Shared data structures used across all modules of the SmartFunding contract.
//!
//! ## Settings / Config split
//!
//! - [`Settings`] — written by the constructor at deployment; names the
//!   owner, the reward token and the currency token.
//! - [`Config`] — written once by `initialize`; holds the funding goal and
//!   the reward budget captured at that moment.
//!
//! Neither is mutated afterwards. The only per-call writes are the
//! [`Investor`] entry of the caller and the global pool.
//!
//! ## Investor lifecycle
//!
//! ```text
//!             invest (+amount)
//!   (empty) ──────────────────► invested > 0 ──── claim ───► claimed = true
//!      ▲                            │
//!      └────────── refund ──────────┘
//! ```
//!
//! `claimed` is never reset. A claimed investor cannot refund.

use soroban_sdk::{contracttype, Address};

/// Deployment-time wiring, written by the constructor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// The only address allowed to call `initialize`.
    pub owner: Address,
    /// Reward token paid out on claim.
    pub token: Address,
    /// Native-currency token contract that investments are made in.
    pub currency: Address,
}

/// Funding configuration, written exactly once by `initialize`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Pricing denominator for rewards. Not a cap on investment.
    pub goal: i128,
    /// Reward-token balance held by the contract at initialization.
    pub reward_budget: i128,
    /// Length of the funding window in days.
    pub duration_days: u32,
    /// Ledger timestamp of initialization.
    pub started_at: u64,
    /// `started_at + duration_days` days. Informational only.
    pub deadline: u64,
}

/// Per-investor ledger entry.
///
/// Absent entries read as `Investor::default()`.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Investor {
    /// Cumulative amount invested since the last refund.
    pub invested: i128,
    /// Set once the reward has been paid out.
    pub claimed: bool,
}

/// Read-only snapshot of the funding state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingSummary {
    pub initialized: bool,
    pub goal: i128,
    pub reward_budget: i128,
    pub pool: i128,
    pub duration_days: u32,
    pub deadline: u64,
}
