//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by SmartFunding.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key        | Type       | Description                              |
//! |------------|------------|------------------------------------------|
//! | `Settings` | `Settings` | Owner, reward token and currency token   |
//! | `Config`   | `Config`   | Goal, reward budget, funding window      |
//! | `Pool`     | `i128`     | Sum of all current investments           |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                 | Type       | Description                  |
//! |---------------------|------------|------------------------------|
//! | `Investor(address)` | `Investor` | Invested amount, claim flag  |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//! Investor entries are never removed; a refund writes a zeroed entry back.

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{Config, Investor, Settings};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Deployment settings (Instance).
    Settings,
    /// Funding configuration, present once initialized (Instance).
    Config,
    /// Aggregate invested amount (Instance).
    Pool,
    /// Ledger entry keyed by investor address (Persistent).
    Investor(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn save_settings(env: &Env, settings: &Settings) {
    env.storage().instance().set(&DataKey::Settings, settings);
    bump_instance(env);
}

/// Settings are written by the constructor, so they are always present
/// on a deployed instance.
pub fn load_settings(env: &Env) -> Settings {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Settings)
        .unwrap_or_else(|| env.panic_with_error(Error::NotInitialized))
}

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn save_config(env: &Env, config: &Config) {
    env.storage().instance().set(&DataKey::Config, config);
    bump_instance(env);
}

/// `None` until `initialize` has run.
pub fn load_config(env: &Env) -> Option<Config> {
    bump_instance(env);
    env.storage().instance().get(&DataKey::Config)
}

pub fn get_pool(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::Pool)
        .unwrap_or(0)
}

pub fn set_pool(env: &Env, pool: i128) {
    env.storage().instance().set(&DataKey::Pool, &pool);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Load the ledger entry for `investor`, or a zeroed entry if none exists.
///
/// Reading never creates an entry.
pub fn load_investor(env: &Env, investor: &Address) -> Investor {
    let key = DataKey::Investor(investor.clone());
    match env.storage().persistent().get::<_, Investor>(&key) {
        Some(entry) => {
            bump_persistent(env, &key);
            entry
        }
        None => Investor::default(),
    }
}

pub fn save_investor(env: &Env, investor: &Address, entry: &Investor) {
    let key = DataKey::Investor(investor.clone());
    env.storage().persistent().set(&key, entry);
    bump_persistent(env, &key);
}
